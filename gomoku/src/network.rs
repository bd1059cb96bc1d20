use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Own stones, opponent stones, last move, first player indicator.
pub const INPUT_PLANES: usize = 4;

const DEFAULT_FILTERS: [usize; 3] = [32, 64, 128];
const POLICY_FILTERS: usize = 4;
const VALUE_FILTERS: usize = 2;
const VALUE_HIDDEN: usize = 64;

/// Same-padded 2D convolution. `weight` is laid out `[out][in][ky][kx]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conv2d {
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: usize,
    pub weight: Vec<f32>,
    pub bias: Vec<f32>,
}

/// Fully connected layer. `weight` is laid out `[out][in]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dense {
    pub in_features: usize,
    pub out_features: usize,
    pub weight: Vec<f32>,
    pub bias: Vec<f32>,
}

/// Serialized parameters of the policy/value network for one board size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub width: usize,
    pub height: usize,
    pub conv1: Conv2d,
    pub conv2: Conv2d,
    pub conv3: Conv2d,
    pub policy_conv: Conv2d,
    pub policy_dense: Dense,
    pub value_conv: Conv2d,
    pub value_dense1: Dense,
    pub value_dense2: Dense,
}

impl Conv2d {
    pub fn zeros(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel_size,
            weight: vec![0.0; out_channels * in_channels * kernel_size * kernel_size],
            bias: vec![0.0; out_channels],
        }
    }

    /// `input` is `[in][height][width]`, the output `[out][height][width]`.
    pub fn forward(&self, input: &[f32], height: usize, width: usize) -> Vec<f32> {
        let k = self.kernel_size;
        let pad = (k / 2) as i64;
        let plane = height * width;
        let mut output = vec![0.0; self.out_channels * plane];

        for o in 0..self.out_channels {
            let out_plane = &mut output[o * plane..(o + 1) * plane];
            out_plane.iter_mut().for_each(|v| *v = self.bias[o]);

            for i in 0..self.in_channels {
                let in_plane = &input[i * plane..(i + 1) * plane];
                let kernel = &self.weight[(o * self.in_channels + i) * k * k..][..k * k];

                for r in 0..height {
                    for c in 0..width {
                        let mut sum = 0.0;

                        for ky in 0..k {
                            let ir = r as i64 + ky as i64 - pad;
                            if ir < 0 || ir >= height as i64 {
                                continue;
                            }

                            for kx in 0..k {
                                let ic = c as i64 + kx as i64 - pad;
                                if ic < 0 || ic >= width as i64 {
                                    continue;
                                }

                                sum += kernel[ky * k + kx] * in_plane[ir as usize * width + ic as usize];
                            }
                        }

                        out_plane[r * width + c] += sum;
                    }
                }
            }
        }

        output
    }

    fn validate(&self, name: &str, in_channels: usize, kernel_size: usize) -> Result<()> {
        ensure!(
            self.in_channels == in_channels,
            "{} expects {} input channels but has {}",
            name,
            in_channels,
            self.in_channels
        );
        ensure!(
            self.kernel_size == kernel_size,
            "{} expects a {}x{} kernel but has {}x{}",
            name,
            kernel_size,
            kernel_size,
            self.kernel_size,
            self.kernel_size
        );
        ensure!(
            self.weight.len() == self.out_channels * self.in_channels * kernel_size * kernel_size,
            "{} weight has {} values, expected {}",
            name,
            self.weight.len(),
            self.out_channels * self.in_channels * kernel_size * kernel_size
        );
        ensure!(
            self.bias.len() == self.out_channels,
            "{} bias has {} values, expected {}",
            name,
            self.bias.len(),
            self.out_channels
        );

        Ok(())
    }
}

impl Dense {
    pub fn zeros(in_features: usize, out_features: usize) -> Self {
        Self {
            in_features,
            out_features,
            weight: vec![0.0; out_features * in_features],
            bias: vec![0.0; out_features],
        }
    }

    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.weight
            .chunks_exact(self.in_features)
            .zip(self.bias.iter())
            .map(|(row, bias)| bias + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>())
            .collect()
    }

    fn validate(&self, name: &str, in_features: usize, out_features: Option<usize>) -> Result<()> {
        ensure!(
            self.in_features == in_features,
            "{} expects {} inputs but has {}",
            name,
            in_features,
            self.in_features
        );
        if let Some(out_features) = out_features {
            ensure!(
                self.out_features == out_features,
                "{} expects {} outputs but has {}",
                name,
                out_features,
                self.out_features
            );
        }
        ensure!(
            self.in_features > 0 && self.weight.len() == self.out_features * self.in_features,
            "{} weight has {} values, expected {}",
            name,
            self.weight.len(),
            self.out_features * self.in_features
        );
        ensure!(
            self.bias.len() == self.out_features,
            "{} bias has {} values, expected {}",
            name,
            self.bias.len(),
            self.out_features
        );

        Ok(())
    }
}

impl NetworkParams {
    /// An all-zero network, which produces uniform priors and a neutral value.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::zeros_with_filters(width, height, DEFAULT_FILTERS)
    }

    pub fn zeros_with_filters(width: usize, height: usize, filters: [usize; 3]) -> Self {
        let cells = width * height;

        Self {
            width,
            height,
            conv1: Conv2d::zeros(INPUT_PLANES, filters[0], 3),
            conv2: Conv2d::zeros(filters[0], filters[1], 3),
            conv3: Conv2d::zeros(filters[1], filters[2], 3),
            policy_conv: Conv2d::zeros(filters[2], POLICY_FILTERS, 1),
            policy_dense: Dense::zeros(POLICY_FILTERS * cells, cells),
            value_conv: Conv2d::zeros(filters[2], VALUE_FILTERS, 1),
            value_dense1: Dense::zeros(VALUE_FILTERS * cells, VALUE_HIDDEN),
            value_dense2: Dense::zeros(VALUE_HIDDEN, 1),
        }
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("Failed to open model file {:?}", path))?;

        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse model file {:?}", path))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("Failed to create model file {:?}", path))?;

        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write model file {:?}", path))
    }

    /// Checks every layer against its neighbours and the board size.
    pub fn validate(&self) -> Result<()> {
        let cells = self.width * self.height;
        ensure!(cells > 0, "Board of {}x{} has no cells", self.height, self.width);

        self.conv1.validate("conv1", INPUT_PLANES, 3)?;
        self.conv2.validate("conv2", self.conv1.out_channels, 3)?;
        self.conv3.validate("conv3", self.conv2.out_channels, 3)?;

        self.policy_conv.validate("policy_conv", self.conv3.out_channels, 1)?;
        self.policy_dense
            .validate("policy_dense", self.policy_conv.out_channels * cells, Some(cells))?;

        self.value_conv.validate("value_conv", self.conv3.out_channels, 1)?;
        self.value_dense1
            .validate("value_dense1", self.value_conv.out_channels * cells, None)?;
        self.value_dense2
            .validate("value_dense2", self.value_dense1.out_features, Some(1))?;

        Ok(())
    }
}

pub(crate) fn relu(values: &mut [f32]) {
    values.iter_mut().for_each(|v| *v = v.max(0.0));
}
