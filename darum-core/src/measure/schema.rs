//! Typed view of a verification log written by `dafny measure-complexity`.
//!
//! There is no published schema for these logs. The shapes below are what the
//! verifier has been observed to emit; anything that does not fit them is
//! rejected when the document is deserialized instead of being looked up
//! field by field later on. Unknown extra fields are ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationLog {
    /// One entry per verified member (function, method, ...) and per trial.
    pub verification_results: Vec<VerificationResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub name: String,
    pub outcome: ElementOutcome,
    pub resource_count: u64,
    #[serde(default)]
    pub vc_results: Vec<VcResult>,
}

/// One assertion batch of a member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcResult {
    pub vc_num: u32,
    pub outcome: BatchOutcome,
    pub resource_count: u64,
    /// Absent in logs made by a plain `dafny verify`.
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assertion {
    pub filename: String,
    pub line: u32,
    pub col: u32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ElementOutcome {
    Correct,
    OutOfResource,
    Errors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BatchOutcome {
    Valid,
    OutOfResource,
    Invalid,
}

/// Where a single cost sample lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Success,
    OutOfResource,
    Failure,
}

impl From<ElementOutcome> for Bucket {
    fn from(outcome: ElementOutcome) -> Self {
        match outcome {
            ElementOutcome::Correct => Bucket::Success,
            ElementOutcome::OutOfResource => Bucket::OutOfResource,
            ElementOutcome::Errors => Bucket::Failure,
        }
    }
}

impl From<BatchOutcome> for Bucket {
    fn from(outcome: BatchOutcome) -> Self {
        match outcome {
            BatchOutcome::Valid => Bucket::Success,
            BatchOutcome::OutOfResource => Bucket::OutOfResource,
            BatchOutcome::Invalid => Bucket::Failure,
        }
    }
}

impl VerificationLog {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}
