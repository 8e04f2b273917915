//! Report topics and their output keywords

use std::fmt;

use serde::Serialize;

/// One named category of aggregate output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Topic {
    /// Arrivals by admission channel and patient type
    Arrivals,
    /// Planned/actual occupancy per department profile
    DepartmentOccupancy,
    /// Discharge outcomes and per-department discharges
    Discharges,
    /// Listing of deceased patients
    Deaths,
    /// Patients arrived to intensive care
    IcuArrived,
    /// Patients moved into intensive care
    IcuMoved,
    /// Patients currently in intensive care
    IcuCurrent,
    /// Intensive care occupancy summary, built from the listings above
    IcuOccupancy,
}

impl Topic {
    /// Topics that consume a dataset, in query submission order
    pub const QUERIED: [Self; 7] = [
        Self::Arrivals,
        Self::DepartmentOccupancy,
        Self::Discharges,
        Self::Deaths,
        Self::IcuArrived,
        Self::IcuMoved,
        Self::IcuCurrent,
    ];

    /// Every topic in assembly order
    pub const ALL: [Self; 8] = [
        Self::Arrivals,
        Self::DepartmentOccupancy,
        Self::Discharges,
        Self::Deaths,
        Self::IcuArrived,
        Self::IcuMoved,
        Self::IcuCurrent,
        Self::IcuOccupancy,
    ];

    /// Keyword under which the topic appears in the final result
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Arrivals => "arrived",
            Self::DepartmentOccupancy => "dept_hosp",
            Self::Discharges => "signout",
            Self::Deaths => "deads",
            Self::IcuArrived => "oar_arrived",
            Self::IcuMoved => "oar_moved",
            Self::IcuCurrent => "oar_current",
            Self::IcuOccupancy => "oar_numbers",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.keyword() == keyword)
    }

    /// Whether the topic passes rows through as a listing
    #[must_use]
    pub const fn is_listing(self) -> bool {
        matches!(
            self,
            Self::Deaths | Self::IcuArrived | Self::IcuMoved | Self::IcuCurrent
        )
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
