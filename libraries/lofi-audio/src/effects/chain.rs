/// Effect chain for processing audio
///
/// Effects are processed in order on a whole buffer at once. Each effect
/// reads the buffer's own sample rate and channel count.
use lofi_core::AudioBuffer;

/// Trait for audio effects that can be chained together
///
/// Implementations own all of their state (delay lines, filter memory), so
/// two effects never share anything and a fresh effect per track keeps
/// concurrent renders independent.
pub trait AudioEffect: Send {
    /// Process an audio buffer in place
    ///
    /// Must not change the number of frames or channels.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Reset effect state (e.g. before reusing it on another track)
    fn reset(&mut self);

    /// Enable/disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Get effect name (for debugging)
    fn name(&self) -> &str;
}

/// Chain of audio effects processed in order
#[derive(Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn AudioEffect>>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect to the end of the chain
    pub fn add_effect(&mut self, effect: Box<dyn AudioEffect>) {
        self.effects.push(effect);
    }

    /// Builder form of [`EffectChain::add_effect`]
    #[must_use]
    pub fn with(mut self, effect: impl AudioEffect + 'static) -> Self {
        self.add_effect(Box::new(effect));
        self
    }

    /// Run the buffer through every enabled effect
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        for effect in &mut self.effects {
            if effect.is_enabled() {
                tracing::trace!("Applying {}", effect.name());
                effect.process(buffer);
            }
        }
    }

    /// Reset all effects in the chain
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    /// Get number of effects in chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Get effect at index
    pub fn get_effect(&self, index: usize) -> Option<&dyn AudioEffect> {
        self.effects.get(index).map(|e| e.as_ref())
    }

    /// Names of the effects, in processing order
    pub fn names(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.name()).collect()
    }
}

impl std::fmt::Debug for EffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectChain")
            .field("effects", &self.names())
            .finish()
    }
}
