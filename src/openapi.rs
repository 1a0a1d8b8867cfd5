use utoipa::OpenApi;

use crate::models::{BookingRequest, BookingView, ClassName, ClassView, NewClass};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::list_classes,
        crate::handlers::create_class,
        crate::handlers::get_class,
        crate::handlers::delete_class,
        crate::handlers::get_ical,
        crate::handlers::book_class,
        crate::handlers::get_bookings
    ),
    components(schemas(ClassName, NewClass, ClassView, BookingRequest, BookingView)),
    tags(
        (name = "booking", description = "Service endpoints"),
        (name = "classes", description = "Fitness class catalog"),
        (name = "bookings", description = "Slot reservations")
    ),
)]
pub struct ApiDoc;
