//! Parameter splitting
//!
//! A completed frame is split on the delimiter into borrowed parameter
//! views. No bytes are copied; the views point into the frame.

use heapless::Vec;

/// Split `frame` into at most `max_parameters` parameters
///
/// The first parameter starts at offset 0 and every delimiter starts a new
/// one, so a frame with `d` delimiters has `d + 1` parameters and an empty
/// frame has one empty parameter. The list is capped at
/// `min(max_parameters, P)` while it is built; parameters past the cap are
/// never produced.
pub fn split_parameters<const P: usize>(
    frame: &[u8],
    delimiter: u8,
    max_parameters: usize,
) -> Vec<&[u8], P> {
    let limit = max_parameters.min(P);
    let mut params = Vec::new();

    for param in frame.split(|&b| b == delimiter).take(limit) {
        if params.push(param).is_err() {
            break;
        }
    }

    params
}

/// Number of parameters in `frame` before any clamping
pub fn count_parameters(frame: &[u8], delimiter: u8) -> usize {
    frame.iter().filter(|&&b| b == delimiter).count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        let params = split_parameters::<10>(b"MOVE|10|20", b'|', 10);

        assert_eq!(params.len(), 3);
        assert_eq!(params[0], b"MOVE");
        assert_eq!(params[1], b"10");
        assert_eq!(params[2], b"20");
    }

    #[test]
    fn test_empty_frame_has_one_empty_parameter() {
        let params = split_parameters::<4>(b"", b'|', 4);

        assert_eq!(params.len(), 1);
        assert!(params[0].is_empty());
        assert_eq!(count_parameters(b"", b'|'), 1);
    }

    #[test]
    fn test_empty_parameters_between_delimiters() {
        let params = split_parameters::<4>(b"|a||", b'|', 4);

        assert_eq!(params.len(), 4);
        assert_eq!(params[0], b"");
        assert_eq!(params[1], b"a");
        assert_eq!(params[2], b"");
        assert_eq!(params[3], b"");
    }

    #[test]
    fn test_clamps_to_max_parameters() {
        let frame = b"a|b|c|d|e";
        let params = split_parameters::<10>(frame, b'|', 3);

        assert_eq!(count_parameters(frame, b'|'), 5);
        assert_eq!(params.len(), 3);
        assert_eq!(params[2], b"c");
    }

    #[test]
    fn test_clamps_to_slot_count() {
        let params = split_parameters::<2>(b"a|b|c", b'|', 10);

        assert_eq!(params.len(), 2);
        assert_eq!(params[1], b"b");
    }
}
