pub mod dashboard_routes;
pub mod payment_routes;
pub mod reservation_routes;
pub mod vehicle_routes;
