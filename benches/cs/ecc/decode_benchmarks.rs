//! Decoding benchmarks
//!
//! Run with: cargo bench --bench ecc_decode

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use galois_codes::ecc::{BchDecoder, BchParams, HammingCode, HammingParams};

/// Batch Hamming decode: one random single-symbol error per row
fn bench_hamming_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("hamming_batch_decode");
    let mut rng = StdRng::seed_from_u64(1);

    for params in [HammingParams::hamming_15_11(), HammingParams::quinary_6_4()] {
        let code = HammingCode::new(&params).expect("preset parameters are valid");
        let q = params.characteristic;

        for rows in [64usize, 1024, 16384] {
            let received: Vec<Vec<u32>> = (0..rows)
                .map(|_| {
                    let word: Vec<u32> = (0..code.data_length())
                        .map(|_| rng.gen_range(0..q))
                        .collect();
                    let mut codeword = code.encode_word(&word).expect("valid word");
                    let position = rng.gen_range(0..codeword.len());
                    codeword[position] = (codeword[position] + 1) % q;
                    codeword
                })
                .collect();

            group.throughput(Throughput::Elements(rows as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("q{}_n{}", q, code.code_length()), rows),
                &received,
                |b, received| b.iter(|| code.decode(black_box(received))),
            );
        }
    }

    group.finish();
}

/// BCH decode with the full number of correctable errors
fn bench_bch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bch_decode");
    let mut rng = StdRng::seed_from_u64(2);

    for params in [BchParams::bch_15_7_2(), BchParams::bch_31_16_3(), BchParams::bch_31_10_5()] {
        let (n, k, t) = (params.n, params.k, params.t);
        let decoder = BchDecoder::new(params).expect("preset parameters are valid");

        let data: Vec<u8> = (0..k).map(|_| rng.gen_range(0..2)).collect();
        let mut received = decoder.code().encode(&data).expect("valid data");
        for position in sample(&mut rng, n, t).into_vec() {
            received[position] ^= 1;
        }

        group.bench_with_input(
            BenchmarkId::new("berlekamp_massey", format!("{}_{}_{}", n, k, t)),
            &received,
            |b, received| b.iter(|| decoder.decode(black_box(received))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hamming_batch, bench_bch);
criterion_main!(benches);
