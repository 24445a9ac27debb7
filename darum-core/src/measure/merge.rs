use crate::measure::error::MeasureError;
use crate::measure::types::Results;

/// Folds the results of one document into the accumulated ones.
///
/// Keys seen for the first time are moved in as they are; known keys get the
/// new cost samples appended. Nothing is ever replaced or removed, so the
/// accumulated samples do not depend on the order documents are merged in
/// (only their position inside each sequence does).
pub fn merge_results(
    accumulated: &mut Results,
    new: Results,
    document: &str,
) -> Result<(), MeasureError> {
    if new.is_empty() {
        return Err(MeasureError::EmptyInput {
            document: document.to_string(),
        });
    }

    for (key, details) in new {
        match accumulated.get_mut(&key) {
            Some(existing) => {
                if existing.location.is_some()
                    && details.location.is_some()
                    && !existing.same_origin(&details)
                {
                    return Err(MeasureError::malformed(
                        document,
                        format!(
                            "{key} is at {} \"{}\" here, but at {} \"{}\" in earlier logs",
                            details.source_position(),
                            details.description,
                            existing.source_position(),
                            existing.description
                        ),
                    ));
                }
                if existing.location.is_none() && details.location.is_some() {
                    existing.filename = details.filename;
                    existing.location = details.location;
                    existing.description = details.description;
                }

                existing.resource_counts.extend(details.resource_counts);
                existing
                    .out_of_resource_counts
                    .extend(details.out_of_resource_counts);
                existing.failure_counts.extend(details.failure_counts);
            }
            None => {
                accumulated.insert(key, details);
            }
        }
    }

    Ok(())
}
