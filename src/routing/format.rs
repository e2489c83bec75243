//! Pure helpers for connection format compatibility and domain bounds.
//!
//! None of these touch the graph; the router combines them while it builds
//! edges and negotiates formats along a path.
//!
//! Conversion matrices are laid out row by source-side format: with `n`
//! sink-side formats, entry `s * n + k` tells whether input arriving as
//! `sink_formats[k]` can leave as `source_formats[s]`.

use crate::config::UNLIMITED_CYCLES;
use crate::topology::{ConnectionFormat, DomainId};
use crate::RoutingError;

/// One allowed pass through a gateway or converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// Format on the sink side (audio entering).
    pub input: ConnectionFormat,
    /// Format on the source side (audio leaving).
    pub output: ConnectionFormat,
}

fn check_matrix(
    matrix: &[bool],
    source_formats: &[ConnectionFormat],
    sink_formats: &[ConnectionFormat],
) -> Result<(), RoutingError> {
    let expected = source_formats.len() * sink_formats.len();
    if matrix.len() == expected {
        Ok(())
    } else {
        Err(RoutingError::unknown(format!(
            "conversion matrix has {} entries, expected {} ({} source x {} sink formats)",
            matrix.len(),
            expected,
            source_formats.len(),
            sink_formats.len()
        )))
    }
}

/// Every conversion the matrix allows, in matrix order.
///
/// An empty result means the element cannot pass audio at all.
///
/// # Errors
///
/// [`RoutingError::Unknown`] if the matrix size is not
/// `source_formats.len() * sink_formats.len()`.
pub fn allowed_formats_from_matrix(
    matrix: &[bool],
    source_formats: &[ConnectionFormat],
    sink_formats: &[ConnectionFormat],
) -> Result<Vec<Conversion>, RoutingError> {
    check_matrix(matrix, source_formats, sink_formats)?;
    if sink_formats.is_empty() {
        return Ok(Vec::new());
    }
    Ok(matrix
        .iter()
        .enumerate()
        .filter(|(_, allowed)| **allowed)
        .map(|(position, _)| Conversion {
            input: sink_formats[position % sink_formats.len()],
            output: source_formats[position / sink_formats.len()],
        })
        .collect())
}

/// Formats both sides support, sorted ascending without duplicates.
#[must_use]
pub fn possible_connection_formats(
    source_formats: &[ConnectionFormat],
    sink_formats: &[ConnectionFormat],
) -> Vec<ConnectionFormat> {
    let mut common: Vec<_> = source_formats
        .iter()
        .copied()
        .filter(|format| sink_formats.contains(format))
        .collect();
    common.sort_unstable();
    common.dedup();
    common
}

/// Output formats reachable when audio enters in `input`, in matrix order.
///
/// Empty if `input` is not one of the sink-side formats.
///
/// # Errors
///
/// [`RoutingError::Unknown`] for a malformed matrix.
pub fn restricted_output_formats(
    matrix: &[bool],
    source_formats: &[ConnectionFormat],
    sink_formats: &[ConnectionFormat],
    input: ConnectionFormat,
) -> Result<Vec<ConnectionFormat>, RoutingError> {
    check_matrix(matrix, source_formats, sink_formats)?;
    let Some(column) = sink_formats.iter().position(|format| *format == input) else {
        return Ok(Vec::new());
    };
    Ok(source_formats
        .iter()
        .enumerate()
        .filter(|(row, _)| matrix[row * sink_formats.len() + column])
        .map(|(_, format)| *format)
        .collect())
}

/// Whether a path whose nodes crossed `visited` (one entry per node, in
/// order) may step into `domain`.
///
/// Staying in the current domain is always allowed. Otherwise the earlier
/// stays in `domain` are counted and the step is refused once that count
/// exceeds `max_cycles`. [`UNLIMITED_CYCLES`] disables the check.
#[must_use]
pub fn should_go_in_domain(visited: &[DomainId], domain: DomainId, max_cycles: u32) -> bool {
    let Some((&current, earlier)) = visited.split_last() else {
        return true;
    };
    if current == domain || max_cycles == UNLIMITED_CYCLES {
        return true;
    }

    let mut stays = 0u32;
    let mut previous = None;
    for &visited_domain in earlier {
        if previous == Some(visited_domain) {
            continue;
        }
        previous = Some(visited_domain);
        if visited_domain == domain {
            stays += 1;
            if stays > max_cycles {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONO: ConnectionFormat = ConnectionFormat::MONO;
    const STEREO: ConnectionFormat = ConnectionFormat::STEREO;
    const ANALOG: ConnectionFormat = ConnectionFormat::ANALOG;
    const AUTO: ConnectionFormat = ConnectionFormat::AUTO;

    fn domains(raw: &[u16]) -> Vec<DomainId> {
        raw.iter().copied().map(DomainId::new).collect()
    }

    #[test]
    fn test_should_go_in_domain_without_cycles() {
        let d = DomainId::new;
        assert!(should_go_in_domain(&[], d(22), 0));
        assert!(should_go_in_domain(&domains(&[22]), d(22), 0));
        assert!(should_go_in_domain(&domains(&[22, 22]), d(22), 0));
        assert!(should_go_in_domain(&domains(&[22, 22]), d(50), 0));
        assert!(should_go_in_domain(&domains(&[22, 22, 30]), d(30), 0));
        assert!(!should_go_in_domain(&domains(&[22, 22, 30]), d(22), 0));
        assert!(should_go_in_domain(&domains(&[22, 22, 30, 30]), d(30), 0));
        assert!(!should_go_in_domain(&domains(&[22, 22, 30, 30]), d(22), 0));
        assert!(should_go_in_domain(&domains(&[22, 22, 30, 30]), d(60), 0));
    }

    #[test]
    fn test_should_go_in_domain_with_cycles() {
        let d = DomainId::new;
        assert!(should_go_in_domain(&domains(&[1, 2]), d(1), 1));
        assert!(should_go_in_domain(&domains(&[1, 2, 1]), d(2), 1));
        assert!(!should_go_in_domain(&domains(&[1, 2, 1, 2]), d(1), 1));
        assert!(should_go_in_domain(&domains(&[1, 2, 1, 2]), d(1), 2));
        assert!(should_go_in_domain(
            &domains(&[1, 2, 1, 2, 1, 2]),
            d(1),
            UNLIMITED_CYCLES
        ));
    }

    #[test]
    fn test_possible_connection_formats() {
        assert_eq!(
            possible_connection_formats(&[ANALOG, STEREO, MONO], &[MONO, ANALOG, AUTO]),
            vec![MONO, ANALOG]
        );
        assert!(possible_connection_formats(&[MONO], &[STEREO]).is_empty());
        assert_eq!(
            possible_connection_formats(&[STEREO, STEREO], &[STEREO]),
            vec![STEREO]
        );
    }

    #[test]
    fn test_allowed_formats_from_matrix() {
        // rows: source MONO, ANALOG; columns: sink STEREO, ANALOG
        let matrix = [true, false, false, true];
        let allowed = allowed_formats_from_matrix(&matrix, &[MONO, ANALOG], &[STEREO, ANALOG])
            .unwrap();
        assert_eq!(
            allowed,
            vec![
                Conversion {
                    input: STEREO,
                    output: MONO
                },
                Conversion {
                    input: ANALOG,
                    output: ANALOG
                },
            ]
        );
    }

    #[test]
    fn test_allowed_formats_rejects_malformed_matrix() {
        let err = allowed_formats_from_matrix(&[true], &[MONO, ANALOG], &[STEREO]).unwrap_err();
        assert!(matches!(err, RoutingError::Unknown { .. }));
        assert!(allowed_formats_from_matrix(&[], &[], &[STEREO])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_restricted_output_formats() {
        // rows: source MONO, ANALOG; columns: sink STEREO, ANALOG
        let matrix = [true, true, false, false];
        let sources = [MONO, ANALOG];
        let sinks = [STEREO, ANALOG];
        assert_eq!(
            restricted_output_formats(&matrix, &sources, &sinks, STEREO).unwrap(),
            vec![MONO]
        );
        assert_eq!(
            restricted_output_formats(&matrix, &sources, &sinks, ANALOG).unwrap(),
            vec![MONO]
        );
        assert!(restricted_output_formats(&matrix, &sources, &sinks, AUTO)
            .unwrap()
            .is_empty());
        assert!(restricted_output_formats(&matrix[..3], &sources, &sinks, STEREO).is_err());
    }
}
