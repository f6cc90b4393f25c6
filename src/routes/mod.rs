// Route exports
pub mod recommendations;

use actix_web::web;
use crate::core::{Geocoder, PlacesSearch};

pub use recommendations::AppState;

pub fn configure_routes<G, P>(cfg: &mut web::ServiceConfig)
where
    G: Geocoder + 'static,
    P: PlacesSearch + 'static,
{
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure::<G, P>),
    );
}
