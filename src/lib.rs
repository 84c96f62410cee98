pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    BrowseDatasetsUseCase, CheckHealthUseCase, Connector, DiscoverSystemsUseCase,
    ExecuteOperationUseCase, SystemRegistry,
};

pub use cli::{Commands, OutputFormat};

pub use connector::{
    ApiConnector, Container, ContainerConfig, CrmConnector, DatabaseConnector, FileConnector,
    InMemorySystemRegistry, Router, DEFAULT_CRM_API_URL,
};

pub use domain::{
    AccessControl, AccessLevel, ConnectorCore, DataCatalog, DataSchema, Dataset, DomainError,
    Endpoint, Environment, HealthState, HealthStatus, Parameters, RegistryStatistics,
    SystemFilter, SystemMetadata, SystemType,
};
