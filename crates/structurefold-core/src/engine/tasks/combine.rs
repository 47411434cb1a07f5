use crate::core::models::profile::StopProfile;
use crate::engine::error::EngineError;
use tracing::instrument;

/// Sums stop profiles position by position, typically replicates of one sample.
/// A transcript present in any input appears in the result.
#[instrument(skip_all, name = "combine_task")]
pub fn run<'a, I>(profiles: I) -> Result<StopProfile, EngineError>
where
    I: IntoIterator<Item = &'a StopProfile>,
{
    let mut combined = StopProfile::new();
    for profile in profiles {
        for (transcript, stops) in profile.iter() {
            match combined.get_mut(transcript) {
                Some(total) => {
                    if total.len() != stops.len() {
                        return Err(EngineError::LengthMismatch {
                            transcript: transcript.to_string(),
                            expected: total.len(),
                            found: stops.len(),
                        });
                    }
                    for (acc, &count) in total.iter_mut().zip(stops) {
                        *acc += count;
                    }
                }
                None => {
                    combined.insert(transcript, stops.to_vec());
                }
            }
        }
    }
    Ok(combined)
}
