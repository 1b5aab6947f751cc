use serde::{Deserialize, Serialize};

use crate::storage::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechnicianStatus {
    Available,
    Busy,
}

/// A lab technician requests are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: String,
    pub name: String,
    /// Matches a request service type string, e.g. "EMC Testing".
    pub specialization: String,
    pub status: TechnicianStatus,
}

impl Collection for Technician {
    const KEY: &'static str = "lab_technicians";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Technician {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialization: specialization.into(),
            status: TechnicianStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == TechnicianStatus::Available
    }

    /// Flip Available to Busy. Returns true if the status changed.
    pub(crate) fn mark_busy(&mut self) -> bool {
        if self.is_available() {
            self.status = TechnicianStatus::Busy;
            true
        } else {
            false
        }
    }
}
