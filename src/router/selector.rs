// Dispatch strategy selection
// Picks the transfer branch for a request from chain and rule metadata only;
// the first matching branch wins
//
// Numan Thabit 2025 Nov

use super::routes::{Strategy, TransferRequest};
use crate::catalog::chains::CONTRACT_ROUTER_V3;
use crate::catalog::{ChainDescriptor, ChainFamily};

/// Same-VM router transfers need an EVM source, a router contract on both
/// chains, and either a token change or a receiver override.
pub fn is_vm_routing_eligible(
    source: &ChainDescriptor,
    destination: &ChainDescriptor,
    request: &TransferRequest,
) -> bool {
    source.family() == ChainFamily::Evm
        && source.contract_address(CONTRACT_ROUTER_V3).is_some()
        && destination.contract_address(CONTRACT_ROUTER_V3).is_some()
        && (request.from_currency != request.to_currency || request.receiver().is_some())
}

pub fn select_strategy(
    source: &ChainDescriptor,
    destination: &ChainDescriptor,
    request: &TransferRequest,
) -> Strategy {
    if is_vm_routing_eligible(source, destination, request) {
        return Strategy::VmRouter;
    }
    match source.family() {
        ChainFamily::ZkLite => Strategy::ZkLite,
        ChainFamily::Loopring => Strategy::Loopring,
        ChainFamily::Starknet => Strategy::Starknet,
        ChainFamily::ImmutableX => Strategy::ImmutableX,
        ChainFamily::Evm if destination.family() == ChainFamily::Starknet => Strategy::ToStarknet,
        ChainFamily::Evm => Strategy::Evm,
    }
}
