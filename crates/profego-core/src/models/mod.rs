//! Data models for the ProfeGo backend API.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `LoginResponse`, `RegisterResponse`, `StorageInfo`: auth endpoints
//! - `FileEntry`, `FileUpload`, `FilePreview`, `UploadResult`: file gallery
//! - `PlanSummary`, `PlanDetail`, `PlanModule`: AI-generated lesson plans
//!
//! Wire field names are kept verbatim; the backend speaks snake_case
//! Spanish (`nombre_plan`, `tiene_diagnostico`, ...).

pub mod auth;
pub mod file;
pub mod plan;

pub use auth::{LoginResponse, RegisterResponse, StorageInfo};
pub use file::{FileCategory, FileEntry, FilePreview, FileUpload, UploadResult};
pub use plan::{
    Actividad, ActividadCierre, ActividadDesarrollo, Cancion, Cuento, CurrentPlanModule,
    GeneratePlanResponse, LegacyPlanModule, Materiales, PlanData, PlanDetail, PlanDetailResponse,
    PlanDocument, PlanListResponse, PlanModule, PlanSummary, RecursosEducativos,
    VinculacionCurricular,
};
