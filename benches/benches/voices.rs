use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use voog_dsp::{FilterSettings, MoogFilter};

const BLOCK: usize = 256;

fn six_voice_chord(c: &mut Criterion) {
    let mut group = c.benchmark_group("voices");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(30);

    group.bench_function("6_voices_44k_block256", |b| {
        let settings = FilterSettings {
            cutoff: 800.0,
            resonance: 0.6,
            env_amount: 24.0,
            key_tracking: 0.5,
            ..FilterSettings::default()
        };
        let notes = [48u8, 52, 55, 60, 64, 67];
        let mut voices: Vec<MoogFilter> = notes
            .iter()
            .map(|_| MoogFilter::from_settings(&settings).expect("filter settings"))
            .collect();
        let input: Vec<f64> = (0..BLOCK).map(|i| ((i % 64) as f64 / 32.0) - 1.0).collect();
        let env: Vec<f64> = (0..BLOCK).map(|i| 1.0 - i as f64 / BLOCK as f64).collect();
        let mut offsets = vec![0.0; BLOCK];
        let mut output = vec![0.0; BLOCK];

        b.iter(|| {
            for (voice, note) in voices.iter_mut().zip(notes) {
                voice.cutoff_offsets(&env, note, &mut offsets);
                voice.render_into(&input, Some(&offsets), &mut output);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, six_voice_chord);
criterion_main!(benches);
