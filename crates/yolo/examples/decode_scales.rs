//! Decodes synthetic outputs of the three YOLOv3 detection scales and logs the boxes.
//!
//! Set `RUST_LOG=yolo=trace` to also see every candidate box.

use miette::Result;
use ndarray::Array3;
use tracing_subscriber::EnvFilter;
use yolo::{Decoder, DecoderConfig};

const BOX_CHANNELS: usize = 4 + 1 + 80;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let decoder = Decoder::new(&DecoderConfig::default())?;

    let outputs = [13, 26, 52]
        .into_iter()
        .enumerate()
        .map(|(scale, size)| {
            let mut netout = Array3::<f32>::from_elem((size, size, 3 * BOX_CHANNELS), -4.0);
            // a single confident anchor box per scale, predicting class `scale`
            let (row, col) = (size / 2, size / 3);
            netout[[row, col, 4]] = 4.0;
            netout[[row, col, 5 + scale]] = 6.0;
            netout
        })
        .collect::<Vec<_>>();
    let views = outputs.iter().map(Array3::view).collect::<Vec<_>>();

    for bbox in decoder.decode_scales(&views)? {
        let [x1, y1, x2, y2] = bbox.bbox().clamp(1.0, 1.0).scaled(416.0, 416.0).coords;
        tracing::info!(
            label = bbox.label(),
            score = bbox.score(),
            objectness = bbox.objectness(),
            "box ({x1:.1}, {y1:.1}) - ({x2:.1}, {y2:.1})"
        );
    }

    Ok(())
}
