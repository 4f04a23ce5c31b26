use carebook_postgres::model::{Service as ServiceModel, UserSummary as UserSummaryModel};
use serde::{Deserialize, Serialize};

use super::{Status, UserSummary};

/// A service together with the doctor offering it.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub doctor: UserSummary,
}

impl Service {
    pub fn from_model(service: ServiceModel, doctor: UserSummaryModel) -> Self {
        Self {
            id: service.id,
            name: service.name,
            address: service.address,
            doctor: doctor.into(),
        }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub service: Service,
    pub status: Status,
}

impl ServiceResponse {
    pub fn new(service: Service, status: Status) -> Self {
        Self { service, status }
    }
}

#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesResponse {
    pub services: Vec<Service>,
    pub status: Status,
}
