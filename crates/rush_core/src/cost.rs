//! Resource cost of every unit and building kind.

use serde::{Deserialize, Serialize};

/// Every kind of thing the economy can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UnitKind {
    /// Production building; each one adds a production slot.
    Facility,
    /// Resource gatherer; also consumed to construct buildings.
    Worker,
    /// Raises population capacity.
    SupplyProvider,
    /// The unit counted towards the goal.
    Military,
    /// One-time unlock required for military production.
    TechFacility,
}

impl UnitKind {
    /// Short lowercase name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Facility => "facility",
            Self::Worker => "worker",
            Self::SupplyProvider => "supply_provider",
            Self::Military => "military",
            Self::TechFacility => "tech_facility",
        }
    }
}

/// Resource cost per kind.
///
/// Defaults follow the reference economy: facility 450, worker 50,
/// supply provider 100, military unit 50, tech facility 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTable {
    /// Cost of a facility.
    pub facility: u32,
    /// Cost of a worker.
    pub worker: u32,
    /// Cost of a supply provider.
    pub supply_provider: u32,
    /// Cost of a military unit.
    pub military: u32,
    /// Cost of the tech facility.
    pub tech_facility: u32,
}

impl CostTable {
    /// Look up the cost of a kind.
    #[must_use]
    pub const fn cost(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Facility => self.facility,
            UnitKind::Worker => self.worker,
            UnitKind::SupplyProvider => self.supply_provider,
            UnitKind::Military => self.military,
            UnitKind::TechFacility => self.tech_facility,
        }
    }
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            facility: 450,
            worker: 50,
            supply_provider: 100,
            military: 50,
            tech_facility: 200,
        }
    }
}
