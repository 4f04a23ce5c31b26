//! Service request types.

use carebook_postgres::model::{NewService, UpdateService as UpdateServiceModel};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for creating a service.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateService {
    /// Unique name of the service.
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Where the service is offered.
    #[validate(length(min = 1, max = 255))]
    pub address: String,

    /// User id of the doctor offering the service.
    pub doctor_id: i64,
}

impl CreateService {
    pub fn into_model(self) -> NewService {
        NewService {
            name: self.name,
            address: self.address,
            doctor_id: self.doctor_id,
        }
    }
}

/// Request payload for a partial service update.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateService {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,

    pub doctor_id: Option<i64>,
}

impl UpdateService {
    pub fn into_model(self) -> UpdateServiceModel {
        UpdateServiceModel {
            name: self.name,
            address: self.address,
            doctor_id: self.doctor_id,
        }
    }
}
