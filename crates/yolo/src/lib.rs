//! Decoding of raw YOLO detection head outputs.
//!
//! A YOLO network predicts, for every cell of a grid and every anchor box of that cell, a set of
//! box offsets, an objectness logit and one logit per class. This crate turns those raw outputs
//! into [`BoundingBox`] candidates:
//!
//! - [`activation`] applies the sigmoid to the logits and computes the conditional class
//!   probabilities,
//! - [`box_coder`] decodes the box offsets relative to the grid cells and anchor priors,
//! - [`decode`] filters the anchor boxes on their objectness and assembles the boxes.
//!
//! Non-max suppression and clipping are left to the consumer of the boxes.
//!
//! ```
//! use ndarray::Array3;
//! use yolo::{anchor::YOLOV3_LARGE, decode_netout};
//!
//! let mut netout = Array3::<f32>::zeros((13, 13, 3 * 85));
//! netout[[6, 6, 4]] = 10.0;
//!
//! let boxes = decode_netout(netout.view(), &YOLOV3_LARGE, 0.5, 416, 416, 3)?;
//! assert_eq!(boxes.len(), 1);
//! # Ok::<(), yolo::Error>(())
//! ```

pub mod activation;
pub mod anchor;
pub mod bbox;
pub mod box_coder;
pub mod boxes;
pub mod config;
pub mod decode;
pub mod error;
pub mod meshgrid;

pub use boxes::BoundingBox;
pub use config::{Config, DecoderConfig, ScaleConfig};
pub use decode::{DEFAULT_NUM_BOXES, Decoder, decode_netout};
pub use error::{Error, Result};
