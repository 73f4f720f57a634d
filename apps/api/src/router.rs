use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use access_cell::AccessGate;
use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::router::appointment_routes;
use appointment_cell::services::ledger::AppointmentLedger;
use directory_cell::handlers::DirectoryCellState;
use directory_cell::router::{brand_routes, hospital_routes};
use directory_cell::services::DirectoryService;
use doctor_cell::handlers::DoctorCellState;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::availability::AvailabilityService;
use doctor_cell::services::catalog::ScheduleCatalog;
use shared_config::AppConfig;
use shared_store::DocumentStore;
use sync_cell::handlers::SyncCellState;
use sync_cell::router::sync_routes;
use sync_cell::SyncHub;

pub fn create_router(config: &AppConfig) -> Router {
    let store = Arc::new(DocumentStore::new(config.feed_channel_capacity));
    let gate = AccessGate::new();

    let doctor_state = Arc::new(DoctorCellState {
        catalog: ScheduleCatalog::new(Arc::clone(&store)),
        availability: AvailabilityService::new(Arc::clone(&store)),
        gate,
    });
    let appointment_state = Arc::new(AppointmentCellState {
        ledger: AppointmentLedger::new(Arc::clone(&store), gate),
    });
    let directory_state = Arc::new(DirectoryCellState {
        directory: DirectoryService::new(Arc::clone(&store)),
        gate,
    });
    let sync_state = Arc::new(SyncCellState {
        hub: Arc::new(SyncHub::new(
            Arc::clone(&store),
            config.fanout_channel_capacity,
        )),
    });

    Router::new()
        .route("/", get(|| async { "MediCare scheduling API is running!" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api/doctors", doctor_routes(doctor_state, Arc::clone(&store)))
        .nest(
            "/api/appointments",
            appointment_routes(appointment_state, Arc::clone(&store)),
        )
        .nest("/api/hospitals", hospital_routes(Arc::clone(&directory_state)))
        .nest("/api/brands", brand_routes(directory_state, Arc::clone(&store)))
        .nest("/api/sync", sync_routes(sync_state))
}
