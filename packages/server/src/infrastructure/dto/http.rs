//! HTTP API DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub connections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassListResponse {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorFractionsDto {
    pub green: f64,
    pub yellow: f64,
    pub red: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDto {
    pub index: usize,
    pub question: String,
    pub answer: Option<String>,
    pub status: String,
    /// RFC 3339, JST.
    pub submitted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub class_id: String,
    pub student_count: usize,
    pub active_student_count: usize,
    pub color_fractions: ColorFractionsDto,
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachContextRequest {
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachContextResponse {
    pub class_id: String,
    pub index: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Dropped inbound events per error kind.
    pub dropped_events: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}
