//! # Store crate — data layer for the portfolio
//!
//! Record types, the [`RemoteStore`] interface to the hosted row API with its REST
//! and in-memory backends, the generic [`RecordManager`] that drives the dashboard
//! screens, and the public read paths in [`catalog`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod remote;

mod memory;
pub use memory::MemoryStore;

mod rest;
pub use rest::RestStore;

pub use catalog::{DashboardStats, SkillGroup};
pub use config::{FolioConfig, RemoteConfig};
pub use error::{ManagerError, StoreError};
pub use manager::{Cardinality, Draft, Many, One, Outcome, Record, RecordManager};
pub use models::{Post, PostDraft, Profile, ProfileDraft, Project, ProjectDraft, SocialLinks};
pub use remote::{Filter, Query, RemoteStore, Row};
