//! Camera frame to model input conversion.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use ndarray::{Array4, ArrayView4};

use crate::config::{CHANNELS, PipelineConfig};
use crate::error::{Error, Result};

/// Normalized model input, shape `[batch, 3, size, size]`, channel-planar.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Array4<f32>,
}

impl InputTensor {
    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Shape as `[batch, channels, height, width]`.
    pub fn shape(&self) -> [usize; 4] {
        let (b, c, h, w) = self.data.dim();
        [b, c, h, w]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat copy in `[batch][channel][row][col]` order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    pub fn into_vec(self) -> Vec<f32> {
        let (values, _) = self.data.into_raw_vec_and_offset();
        values
    }
}

/// Builds [`InputTensor`]s from camera frames.
///
/// The frame is stretched to `size x size`, rotated 90 degrees clockwise to
/// undo the sensor orientation, and each channel is divided by 255. The last
/// row and last column of the rotated frame are not sampled and stay zero;
/// the deployed model was fed this way and its thresholds assume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorBuilder {
    input_size: u32,
    batch_size: usize,
    channels: usize,
}

impl Default for TensorBuilder {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl TensorBuilder {
    pub fn new(input_size: u32, batch_size: usize) -> Self {
        Self {
            input_size,
            batch_size,
            channels: CHANNELS,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.input_size, config.batch_size).with_channels(config.channels)
    }

    /// Override the channel count. Only RGB (3) frames can be built.
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Scale, rotate and normalize a frame of any resolution.
    pub fn build(&self, image: &DynamicImage) -> Result<InputTensor> {
        self.check_channels()?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidImage { width, height });
        }

        let rgb = image
            .resize_exact(self.input_size, self.input_size, FilterType::Triangle)
            .rotate90()
            .to_rgb8();
        self.normalize(&rgb)
    }

    /// Normalize an already scaled and rotated `size x size` RGB frame into
    /// batch entry 0.
    pub fn normalize(&self, rgb: &RgbImage) -> Result<InputTensor> {
        self.check_channels()?;
        let (width, height) = rgb.dimensions();
        if width != self.input_size || height != self.input_size || self.batch_size == 0 {
            return Err(Error::InvalidImage { width, height });
        }

        let size = self.input_size as usize;
        let mut data = Array4::<f32>::zeros((self.batch_size, CHANNELS, size, size));
        let sampled = self.input_size.saturating_sub(1);

        for row in 0..sampled {
            for col in 0..sampled {
                let [r, g, b] = rgb.get_pixel(col, row).0;
                let (y, x) = (row as usize, col as usize);
                data[[0, 0, y, x]] = r as f32 / 255.0;
                data[[0, 1, y, x]] = g as f32 / 255.0;
                data[[0, 2, y, x]] = b as f32 / 255.0;
            }
        }

        Ok(InputTensor { data })
    }

    fn check_channels(&self) -> Result<()> {
        if self.channels != CHANNELS {
            return Err(Error::UnsupportedChannels {
                channels: self.channels,
            });
        }
        Ok(())
    }
}
