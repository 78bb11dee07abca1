use ndarray::{Array3, s};
use rand::{Rng, SeedableRng, rngs::StdRng};
use yolo::{
    BoundingBox, Decoder, DecoderConfig, Result,
    activation::sigmoid,
    anchor::{YOLOV3_LARGE, YOLOV3_MEDIUM, YOLOV3_SMALL},
    decode_netout,
};

const NUM_CLASSES: usize = 80;
const BOX_CHANNELS: usize = 4 + 1 + NUM_CLASSES;

fn random_netout(rows: usize, cols: usize, seed: u64) -> Array3<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_simple_fn((rows, cols, 3 * BOX_CHANNELS), || {
        rng.random_range(-3.0..3.0)
    })
}

fn assert_same_boxes(a: &[BoundingBox], b: &[BoundingBox]) {
    assert_eq!(a.len(), b.len());
    for (a, b) in a.iter().zip(b) {
        assert_eq!(a.bbox(), b.bbox());
        assert_eq!(a.objectness(), b.objectness());
        assert_eq!(a.classes(), b.classes());
        assert_eq!(a.label(), b.label());
        assert_eq!(a.score(), b.score());
    }
}

#[test]
fn single_confident_anchor() -> Result<()> {
    let mut netout = Array3::<f32>::zeros((1, 1, 3 * BOX_CHANNELS));
    netout[[0, 0, 4]] = 10.0;

    let boxes = decode_netout(netout.view(), &YOLOV3_LARGE, 0.5, 416, 416, 3)?;
    assert_eq!(boxes.len(), 1);

    let bbox = &boxes[0];
    let w = 116.0 / 416.0;
    assert!((bbox.xmin() - (0.5 - w / 2.0)).abs() < 1e-6);
    assert!((bbox.xmin() - 0.360_577).abs() < 1e-6);
    assert!((bbox.ymin() - (0.5 - 90.0 / 416.0 / 2.0)).abs() < 1e-6);
    assert!((bbox.xmax() - (0.5 + w / 2.0)).abs() < 1e-6);
    assert!((bbox.objectness() - sigmoid(10.0)).abs() < 1e-6);

    assert_eq!(bbox.classes().len(), NUM_CLASSES);
    assert!(
        bbox.classes()
            .iter()
            .all(|&p| (p - 0.5 * sigmoid(10.0)).abs() < 1e-6)
    );
    assert_eq!(bbox.label(), 0);
    assert_eq!(bbox.score(), bbox.classes()[0]);

    Ok(())
}

#[test]
fn geometry_matches_closed_form() -> Result<()> {
    let (tx, ty, tw, th) = (0.3_f64, -1.2_f64, 0.7_f64, -0.4_f64);
    let (aw, ah) = (30.0_f64, 61.0_f64);
    let (rows, cols, row, col) = (4, 5, 2, 3);

    let mut netout = Array3::<f32>::zeros((rows, cols, 6));
    netout
        .slice_mut(s![row, col, ..5])
        .assign(&ndarray::arr1(&[tx as f32, ty as f32, tw as f32, th as f32, 5.0]));

    let boxes = decode_netout(netout.view(), &[aw as f32, ah as f32], 0.5, 320, 416, 1)?;
    assert_eq!(boxes.len(), 1);

    let sigmoid64 = |x: f64| 1.0 / (1.0 + (-x).exp());
    let cx = (col as f64 + sigmoid64(tx)) / cols as f64;
    let cy = (row as f64 + sigmoid64(ty)) / rows as f64;
    let w = aw * tw.exp() / 416.0;
    let h = ah * th.exp() / 320.0;

    let expected = [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0];
    for (actual, expected) in boxes[0].bbox().coords.iter().zip(expected) {
        assert!(
            (f64::from(*actual) - expected).abs() < 1e-6,
            "{actual} != {expected}"
        );
    }

    Ok(())
}

#[test]
fn threshold_filters_anchor_boxes() -> Result<()> {
    let netout = random_netout(13, 13, 0);
    let obj_thresh = 0.5;

    let expected = netout
        .to_shape((13, 13, 3, BOX_CHANNELS))
        .unwrap()
        .slice(s![.., .., .., 4])
        .iter()
        .map(|&logit| sigmoid(logit))
        .filter(|&p| p > obj_thresh)
        .collect::<Vec<_>>();

    let boxes = decode_netout(netout.view(), &YOLOV3_LARGE, obj_thresh, 416, 416, 3)?;

    assert!(!boxes.is_empty());
    assert_eq!(
        boxes.iter().map(BoundingBox::objectness).collect::<Vec<_>>(),
        expected
    );
    assert!(boxes.iter().all(|b| b.objectness() > obj_thresh));
    assert!(boxes.iter().all(|b| b.classes().iter().any(|&p| p > 0.0)));

    Ok(())
}

#[test]
fn threshold_above_one_yields_nothing() -> Result<()> {
    let mut netout = random_netout(13, 13, 1);
    netout.slice_mut(s![.., .., 4]).fill(50.0);

    let boxes = decode_netout(netout.view(), &YOLOV3_LARGE, 1.1, 416, 416, 3)?;
    assert!(boxes.is_empty());

    Ok(())
}

#[test]
fn decoding_is_deterministic() -> Result<()> {
    let netout = random_netout(26, 26, 2);

    let first = decode_netout(netout.view(), &YOLOV3_MEDIUM, 0.3, 416, 416, 3)?;
    let second = decode_netout(netout.view(), &YOLOV3_MEDIUM, 0.3, 416, 416, 3)?;

    assert_same_boxes(&first, &second);

    Ok(())
}

#[test]
fn input_is_left_untouched() -> Result<()> {
    let netout = random_netout(13, 13, 3);
    let copy = netout.clone();

    decode_netout(netout.view(), &YOLOV3_LARGE, 0.5, 416, 416, 3)?;
    assert_eq!(netout, copy);

    Ok(())
}

#[test]
fn non_contiguous_input() -> Result<()> {
    let netout = random_netout(13, 13, 4);
    let mut transposed = Array3::<f32>::zeros((13, 13, 3 * BOX_CHANNELS));
    transposed.swap_axes(0, 1);
    transposed.assign(&netout);

    let expected = decode_netout(netout.view(), &YOLOV3_LARGE, 0.5, 416, 416, 3)?;
    let actual = decode_netout(transposed.view(), &YOLOV3_LARGE, 0.5, 416, 416, 3)?;

    assert_same_boxes(&expected, &actual);

    Ok(())
}

#[test]
fn decode_all_scales() -> Result<()> {
    let decoder = Decoder::new(&DecoderConfig::default())?;

    let outputs = [13, 26, 52]
        .into_iter()
        .map(|size| {
            let mut netout = Array3::<f32>::from_elem((size, size, 3 * BOX_CHANNELS), -5.0);
            // second anchor box of the last cell
            netout[[size - 1, size - 1, BOX_CHANNELS + 4]] = 5.0;
            netout
        })
        .collect::<Vec<_>>();
    let views = outputs.iter().map(Array3::view).collect::<Vec<_>>();

    let boxes = decoder.decode_scales(&views)?;
    assert_eq!(boxes.len(), 3);

    for (bbox, anchors) in boxes.iter().zip([YOLOV3_LARGE, YOLOV3_MEDIUM, YOLOV3_SMALL]) {
        let [x1, _, x2, _] = bbox.bbox().coords;
        let expected = anchors[2] * (-5.0_f32).exp() / 416.0;
        assert!(((x2 - x1) - expected).abs() < 1e-6);
        assert!(x2 > 0.9);
    }

    Ok(())
}
