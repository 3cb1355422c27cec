//! End-to-end portfolio construction.

use crate::allocator::DiscreteAllocator;
use crate::error::PortfolioResult;
use crate::optimizer::{BondAssumptions, MeanVarianceOptimizer};
use crate::portfolio::Portfolio;
use crate::request::PortfolioRequest;
use crate::snapshot::MarketSnapshot;

/// Builds a portfolio for the request against the snapshot.
///
/// Two stages: solve continuous mean-variance weights for the tier's
/// return target, then turn them into whole-lot and whole-unit purchases.
/// The same snapshot and request always produce the same portfolio.
///
/// # Errors
///
/// Any [`crate::error::PortfolioError`]; the common caller-facing cases
/// are an invalid request and an infeasible return target.
pub fn build_portfolio(
    snapshot: &MarketSnapshot,
    request: &PortfolioRequest,
) -> PortfolioResult<Portfolio> {
    request.validate()?;

    let assumptions = BondAssumptions::for_tier(request.risk);
    let weights = MeanVarianceOptimizer::new().optimize(
        snapshot.statistics(),
        &assumptions,
        request.risk.target_return_pct(),
    )?;

    DiscreteAllocator::new().allocate(snapshot, &weights, request)
}
