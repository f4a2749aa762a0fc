// Router module - route resolution and transfer dispatch
// This file wires strategy selection, validation and per-branch execution
// behind the pipeline facade
//
// Numan Thabit 2025 Nov

pub mod execution;
pub mod routes;
pub mod selector;
pub mod validation;

#[allow(clippy::module_inception)]
pub mod router;

pub use router::{create_api_router, ApiState, Router};
pub use routes::{
    RefundRequest, ResolvedTransferPlan, RouterInstruction, Strategy, TransferExt, TransferRequest,
};
pub use selector::{is_vm_routing_eligible, select_strategy};
