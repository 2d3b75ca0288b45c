/// One host block: per-channel sample buffers mutated in place.
///
/// The first `input_channels` channels carry host input; anything after
/// them is pure output.
pub struct AudioBlock<'a, 'b> {
    channels: &'a mut [&'b mut [f32]],
    input_channels: usize,
}

impl<'a, 'b> AudioBlock<'a, 'b> {
    pub fn new(channels: &'a mut [&'b mut [f32]], input_channels: usize) -> Self {
        Self {
            channels,
            input_channels,
        }
    }

    /// Output-only block, as a synth instrument normally receives.
    pub fn output_only(channels: &'a mut [&'b mut [f32]]) -> Self {
        Self::new(channels, 0)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    /// Shortest channel length; channels may be handed over with slack.
    pub fn frames(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.len())
            .min()
            .unwrap_or(0)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        let frames = self.frames();
        self.channels.get(index).map(|channel| &channel[..frames])
    }

    pub fn clear_from(&mut self, first_channel: usize) {
        let frames = self.frames();
        for channel in self.channels.iter_mut().skip(first_channel) {
            channel[..frames].fill(0.0);
        }
    }

    pub fn apply_gain(&mut self, gain: f32) {
        let frames = self.frames();
        for channel in self.channels.iter_mut() {
            for value in channel[..frames].iter_mut() {
                *value *= gain;
            }
        }
    }

    /// Left and optional right channel, truncated to `frames()`.
    pub fn stereo_mut(&mut self) -> Option<(&mut [f32], Option<&mut [f32]>)> {
        let frames = self.frames();
        let (first, rest) = self.channels.split_first_mut()?;
        let left = &mut first[..frames];
        let right = rest.first_mut().map(|channel| &mut channel[..frames]);
        Some((left, right))
    }

    pub fn peak(&self) -> f32 {
        let frames = self.frames();
        self.channels
            .iter()
            .flat_map(|channel| channel[..frames].iter())
            .fold(0.0_f32, |peak, value| peak.max(value.abs()))
    }

    pub fn is_silent(&self) -> bool {
        self.peak() == 0.0
    }
}
