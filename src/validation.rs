/// Validation tests across the whole codec.
///
/// These tests verify:
/// 1. **Round-trip correctness** for single-threaded and parallel paths
/// 2. **Equivalence** - parallel output equals single-threaded output
/// 3. **Regression vectors** - fixed encodings that must never change
/// 4. **Edge cases** - degenerate inputs and adversarial marker placement
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::parallel::{self, ParallelOptions, CHUNK_SIZE};
    use crate::{chunk, Qb64Error};

    const DEADLINE: Duration = Duration::from_secs(60);

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    fn data_all_ff(n: usize) -> Vec<u8> {
        vec![0xFFu8; n]
    }

    /// Every byte value once.
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// Sawtooth over all byte values.
    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    /// UTF-8 text with multi-byte characters.
    fn data_unicode_text(repeats: usize) -> Vec<u8> {
        "VERY LONG UNICODE TEST 超长字符测试"
            .repeat(repeats)
            .into_bytes()
    }

    fn all_vectors() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("empty", Vec::new()),
            ("single", vec![0x42]),
            ("zeros", data_all_zeros(20_000)),
            ("ff", data_all_ff(20_000)),
            ("uniform", data_uniform()),
            ("sawtooth", data_sawtooth(50_000)),
            ("unicode", data_unicode_text(2_000)),
        ]
    }

    fn round_trip_parallel(input: &[u8], options: &ParallelOptions) -> Vec<u8> {
        let texts = parallel::encode_parallel_with_options(input, DEADLINE, options).unwrap();
        let text = parallel::flatten_text(&texts);
        parallel::flatten(&parallel::decode_parallel_with_options(&text, DEADLINE, options).unwrap())
    }

    // ---------------------------------------------------------------
    // 1. Round trips
    // ---------------------------------------------------------------

    #[test]
    fn test_single_thread_round_trip_all_vectors() {
        for (name, input) in all_vectors() {
            let decoded = chunk::decode(&chunk::encode(&input)).unwrap();
            assert_eq!(decoded, input, "vector {}", name);
        }
    }

    #[test]
    fn test_parallel_round_trip_all_vectors() {
        for (name, input) in all_vectors() {
            for threads in [1, 3, 16] {
                let options = ParallelOptions::with_threads(threads);
                assert_eq!(
                    round_trip_parallel(&input, &options),
                    input,
                    "vector {} threads {}",
                    name,
                    threads
                );
            }
        }
    }

    // ---------------------------------------------------------------
    // 2. Equivalence
    // ---------------------------------------------------------------

    #[test]
    fn test_parallel_encode_equals_single_thread() {
        for (name, input) in all_vectors() {
            let single = chunk::encode(&input);
            let texts = parallel::encode_parallel(&input, DEADLINE).unwrap();
            assert_eq!(parallel::flatten_text(&texts), single, "vector {}", name);
        }
    }

    #[test]
    fn test_cross_path_decode() {
        // Text from one path decodes identically on the other.
        let input = data_unicode_text(5_000);
        let single_text = chunk::encode(&input);
        let parallel_bytes =
            parallel::flatten(&parallel::decode_parallel(&single_text, DEADLINE).unwrap());
        assert_eq!(parallel_bytes, input);

        let parallel_text =
            parallel::flatten_text(&parallel::encode_parallel(&input, DEADLINE).unwrap());
        assert_eq!(chunk::decode(&parallel_text).unwrap(), input);
    }

    // ---------------------------------------------------------------
    // 3. Regression vectors
    // ---------------------------------------------------------------

    #[test]
    fn test_hello_star_parallel() {
        let input = "Hello★".as_bytes();
        let texts = parallel::encode_parallel(input, DEADLINE).unwrap();
        assert_eq!(parallel::flatten_text(&texts), "?I?l?s?s?v@iYF");
        let bytes = parallel::decode_parallel("?I?l?s?s?v@iYF", DEADLINE).unwrap();
        assert_eq!(parallel::flatten(&bytes), input);
    }

    #[test]
    fn test_expansion_bounds() {
        // Quartile 0 bytes take one character, all others two.
        assert_eq!(chunk::encode(&[0x80; 100]).len(), 100);
        assert_eq!(chunk::encode(&[0x00; 100]).len(), 200);
        assert_eq!(chunk::encode(&data_uniform()).len(), 64 + 192 * 2);
    }

    // ---------------------------------------------------------------
    // 4. Edge cases
    // ---------------------------------------------------------------

    #[test]
    fn test_marker_straddles_every_possible_chunk_offset() {
        // Shift a single marker-producing byte across the first boundary.
        let options = ParallelOptions::with_threads(64);
        for prefix in CHUNK_SIZE - 3..CHUNK_SIZE + 2 {
            let mut input = vec![0x80u8; prefix];
            input.push(0x7F);
            input.extend_from_slice(&[0x80u8; 10]);
            assert_eq!(
                round_trip_parallel(&input, &options),
                input,
                "prefix {}",
                prefix
            );
        }
    }

    #[test]
    fn test_invalid_symbol_both_paths() {
        for bad in [" ", "=", "/", "\n", "é"] {
            let text = format!("?I?l{}?s", bad);
            let single = chunk::decode(&text).unwrap_err();
            let par = parallel::decode_parallel(&text, DEADLINE).unwrap_err();
            assert_eq!(single, par, "bad symbol {:?}", bad);
            assert!(matches!(single, Qb64Error::InvalidSymbol { offset: 4, .. }));
        }
    }

    #[test]
    fn test_error_messages() {
        let err = chunk::decode("A B").unwrap_err();
        assert_eq!(err.to_string(), "invalid symbol ' ' at offset 1");
        let err = Qb64Error::Timeout {
            deadline: Duration::from_millis(5),
        };
        assert_eq!(err.to_string(), "parallel workers did not finish within 5ms");
    }
}
