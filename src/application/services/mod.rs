//! Application services - Orchestration of domain logic

pub mod metrics_service;
pub mod presenter_service;
pub mod reconciliation_service;

pub use metrics_service::MetricsService;
pub use presenter_service::{
    DonateSplitView, ExpiredView, InfoView, LivePaymentView, PayerView, PresenterService,
    StatusView,
};
pub use reconciliation_service::{ReconcileOutcome, ReconciliationService};
