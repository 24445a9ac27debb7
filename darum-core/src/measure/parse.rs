//! Document Parser
//!
//! Turns one verification log into [`Results`]. Each verification result of
//! the log is one member verified under one random seed (a trial). It yields
//! an AB 0 entry holding the member's total cost, plus one entry per
//! assertion batch it contains.
//!
//! Batches are walked in batch-number order, which is taken to be the order
//! in which the verifier discharged them. The log itself lists them in
//! whatever order the solver cores finished. Once a batch fails or runs out of
//! resources, every later batch of the same trial is vacuously valid. Those
//! batches are checked but not counted.
//!
//! Because the log format is undocumented, every cross-check below is fatal:
//! they are the only guard against silently misreading a changed format.

use crate::measure::error::MeasureError;
use crate::measure::locations::{LocationIndex, SourceLocation};
use crate::measure::schema::{
    BatchOutcome, Bucket, ElementOutcome, VcResult, VerificationLog, VerificationResult,
};
use crate::measure::types::{
    Details, Location, MULTI_ASSERTION_DESCRIPTION, PHANTOM_DESCRIPTION, Results, ab_digits,
    batch_key, shorten_display_name,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Everything extracted from one log document.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub results: Results,
    pub locations: LocationIndex,
    /// Random seed → summed cost of every member verified under it.
    pub trial_costs: BTreeMap<u64, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    OutOfResource,
    Failure,
}

/// Progress through the batches of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchState {
    Active,
    Skipping(SkipReason),
}

pub fn parse_log(document: &str, contents: &str) -> Result<ParsedLog, MeasureError> {
    let log = VerificationLog::from_json(contents).map_err(|e| {
        MeasureError::malformed(
            document,
            format!("expected an object with a verificationResults list: {e}"),
        )
    })?;

    parse_document(document, &log)
}

pub fn parse_document(document: &str, log: &VerificationLog) -> Result<ParsedLog, MeasureError> {
    debug!(
        document,
        results = log.verification_results.len(),
        "parsing verification results"
    );

    let mut parsed = ParsedLog::default();
    for result in &log.verification_results {
        parse_result(document, result, &mut parsed)?;
    }

    let costs = parsed.trial_costs.values();
    if let (Some(min), Some(max)) = (costs.clone().min(), costs.max()) {
        info!(document, trials = parsed.trial_costs.len(), min, max, "trial costs");
    }

    Ok(parsed)
}

fn parse_result(
    document: &str,
    vr: &VerificationResult,
    parsed: &mut ParsedLog,
) -> Result<(), MeasureError> {
    let name = shorten_display_name(&vr.name);

    // The seed only appears on the batches, but is the same for all of them.
    let seed = vr
        .vc_results
        .first()
        .and_then(|vcr| vcr.random_seed)
        .ok_or_else(|| {
            MeasureError::malformed(
                document,
                format!(
                    "{name} has no random seed. Maybe this log was created by `dafny verify` instead of `measure-complexity`?"
                ),
            )
        })?;

    *parsed.trial_costs.entry(seed).or_insert(0) += vr.resource_count;

    // The first batches can legitimately be empty (e.g. in isolated-assertions mode).
    let filename = vr
        .vc_results
        .iter()
        .find_map(|vcr| vcr.assertions.first())
        .map(|a| a.filename.clone())
        .ok_or_else(|| {
            MeasureError::malformed(document, format!("{name} has no batch with assertions"))
        })?;

    let element = parsed
        .results
        .get_or_insert_with(&name, || Details::new(&name, 0));
    element.filename = filename.clone();
    element.record(Bucket::from(vr.outcome), vr.resource_count);

    let mut batches: Vec<&VcResult> = vr.vc_results.iter().collect();
    batches.sort_by_key(|vcr| vcr.vc_num);

    let max_ab = batches.last().map(|vcr| vcr.vc_num).unwrap_or(0);
    let digits = ab_digits(max_ab);

    let mut state = BatchState::Active;
    let mut batch_costs: u64 = 0;

    for vcr in batches {
        if vcr.random_seed != Some(seed) {
            return Err(MeasureError::malformed(
                document,
                format!(
                    "random seed mismatch in {name}: {seed} vs {:?} in AB{}",
                    vcr.random_seed, vcr.vc_num
                ),
            ));
        }

        let key = batch_key(&name, vcr.vc_num, digits);

        if let BatchState::Skipping(reason) = state {
            // After a batch fails, the rest behaves like `assume false; assert X`.
            if vcr.outcome != BatchOutcome::Valid {
                return Err(MeasureError::malformed(
                    document,
                    format!(
                        "skipping after {} in {name}, yet {key} is {:?}",
                        match reason {
                            SkipReason::OutOfResource => "an OoR batch",
                            SkipReason::Failure => "a failed batch",
                        },
                        vcr.outcome
                    ),
                ));
            }
            // Not counted, but the verifier did produce it at this location.
            let (origin_file, location, description) = batch_origin(vcr, &filename);
            parsed.locations.record(
                SourceLocation {
                    filename: origin_file,
                    element: name.clone(),
                    location,
                },
                seed,
                vcr.vc_num,
                &description,
            );
            continue;
        }

        let (origin_file, location, description) = batch_origin(vcr, &filename);
        let details = parsed
            .results
            .get_or_insert_with(&key, || Details::new(&name, vcr.vc_num));

        match details.location {
            None => {
                details.filename = origin_file;
                details.location = Some(location);
                details.description = description;
            }
            Some(previous) => {
                if details.filename != origin_file
                    || previous != location
                    || details.description != description
                {
                    return Err(MeasureError::malformed(
                        document,
                        format!(
                            "{key} moved from {}:{previous} \"{}\" to {origin_file}:{location} \"{description}\"",
                            details.filename, details.description
                        ),
                    ));
                }
            }
        }

        parsed.locations.record(
            SourceLocation {
                filename: details.filename.clone(),
                element: name.clone(),
                location,
            },
            seed,
            vcr.vc_num,
            &details.description,
        );

        match vcr.outcome {
            BatchOutcome::OutOfResource => {
                expect_element_outcome(document, &key, vr, ElementOutcome::OutOfResource)?;
                details.record(Bucket::OutOfResource, vcr.resource_count);
                debug!(
                    "{key} is OoR, skipping remaining {} ABs in {name}",
                    max_ab - vcr.vc_num
                );
                state = BatchState::Skipping(SkipReason::OutOfResource);
            }
            BatchOutcome::Invalid => {
                expect_element_outcome(document, &key, vr, ElementOutcome::Errors)?;
                details.record(Bucket::Failure, vcr.resource_count);
                debug!(
                    "{key} is Invalid, skipping remaining {} ABs in {name}",
                    max_ab - vcr.vc_num
                );
                state = BatchState::Skipping(SkipReason::Failure);
            }
            BatchOutcome::Valid => {
                details.record(Bucket::Success, vcr.resource_count);
                batch_costs += vcr.resource_count;
            }
        }
    }

    if state == BatchState::Active {
        if batch_costs != vr.resource_count {
            return Err(MeasureError::inconsistent(
                document,
                &name,
                format!(
                    "reported cost is {}, but the sum of its ABs' costs is {batch_costs}",
                    vr.resource_count
                ),
            ));
        }
        if vr.outcome != ElementOutcome::Correct {
            return Err(MeasureError::inconsistent(
                document,
                &name,
                format!("outcome is {:?} but all its ABs were Valid", vr.outcome),
            ));
        }
    }

    Ok(())
}

fn expect_element_outcome(
    document: &str,
    key: &str,
    vr: &VerificationResult,
    expected: ElementOutcome,
) -> Result<(), MeasureError> {
    if vr.outcome == expected {
        return Ok(());
    }
    Err(MeasureError::malformed(
        document,
        format!(
            "{key} implies {expected:?}, but {} reports {:?}",
            shorten_display_name(&vr.name),
            vr.outcome
        ),
    ))
}

/// Filename, location and description of a batch. Batches with several
/// assertions only keep their line range.
fn batch_origin(vcr: &VcResult, element_filename: &str) -> (String, Location, String) {
    match vcr.assertions.as_slice() {
        [] => (
            element_filename.to_string(),
            Location::Phantom,
            PHANTOM_DESCRIPTION.to_string(),
        ),
        [assertion] => (
            assertion.filename.clone(),
            Location::Point {
                line: assertion.line,
                col: assertion.col,
            },
            assertion.description.clone(),
        ),
        many => {
            let first = many.iter().map(|a| a.line).min().unwrap_or(0);
            let last = many.iter().map(|a| a.line).max().unwrap_or(0);
            (
                element_filename.to_string(),
                Location::Lines { first, last },
                MULTI_ASSERTION_DESCRIPTION.to_string(),
            )
        }
    }
}
