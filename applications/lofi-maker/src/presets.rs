//! Effect selection from config presets and command-line overrides

use crate::config::EffectPreset;
use crate::error::{AppError, Result};
use lofi_core::EffectSpec;
use std::path::PathBuf;

/// Parse a `key=volume` argument.
///
/// The split happens at the last `=`, so paths containing `=` still work.
pub fn parse_assignment(arg: &str) -> Result<(String, f32)> {
    let (key, volume) = arg.rsplit_once('=').ok_or_else(|| {
        AppError::Config(format!("expected KEY=VOLUME, got {arg:?}"))
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::Config(format!("missing name in {arg:?}")));
    }

    let volume: f32 = volume
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("invalid volume in {arg:?}")))?;
    if !volume.is_finite() || volume < 0.0 {
        return Err(AppError::Config(format!(
            "volume must be a non-negative number in {arg:?}"
        )));
    }

    Ok((key.to_string(), volume))
}

/// Build the effect list for a render.
///
/// Config presets come first, in config order, with volumes replaced by any
/// `preset_overrides` naming them. Explicit `files` follow. Anything at
/// volume 0 is left out.
pub fn resolve_effects(
    presets: &[EffectPreset],
    preset_overrides: &[(String, f32)],
    files: &[(String, f32)],
) -> Result<Vec<EffectSpec>> {
    for (name, _) in preset_overrides {
        if !presets.iter().any(|p| &p.name == name) {
            return Err(AppError::Config(format!(
                "unknown effect preset {name:?} (see `lofi-maker presets`)"
            )));
        }
    }

    let mut effects: Vec<EffectSpec> = presets
        .iter()
        .map(|preset| {
            let volume = preset_overrides
                .iter()
                .rev()
                .find(|(name, _)| name == &preset.name)
                .map_or(preset.volume, |(_, volume)| *volume);
            EffectSpec::new(preset.path.clone(), volume)
        })
        .collect();

    effects.extend(
        files
            .iter()
            .map(|(path, volume)| EffectSpec::new(PathBuf::from(path), *volume)),
    );
    effects.retain(|effect| !effect.is_silent());

    for effect in &effects {
        effect.validate()?;
    }
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(name: &str, volume: f32) -> EffectPreset {
        EffectPreset {
            name: name.to_string(),
            path: PathBuf::from(format!("fx/{name}.wav")),
            volume,
        }
    }

    #[test]
    fn parses_assignments() {
        assert_eq!(parse_assignment("rain=0.4").unwrap(), ("rain".to_string(), 0.4));
        assert_eq!(
            parse_assignment("fx/a=b.wav=1").unwrap(),
            ("fx/a=b.wav".to_string(), 1.0)
        );
        assert!(parse_assignment("rain").is_err());
        assert!(parse_assignment("=0.5").is_err());
        assert!(parse_assignment("rain=loud").is_err());
        assert!(parse_assignment("rain=-1").is_err());
    }

    #[test]
    fn silent_presets_are_dropped() {
        let presets = [preset("rain", 0.0), preset("vinyl", 0.3)];
        let effects = resolve_effects(&presets, &[], &[]).unwrap();
        assert_eq!(effects, vec![EffectSpec::new("fx/vinyl.wav", 0.3)]);
    }

    #[test]
    fn overrides_enable_and_disable_presets() {
        let presets = [preset("rain", 0.0), preset("vinyl", 0.3)];
        let overrides = [("rain".to_string(), 0.5), ("vinyl".to_string(), 0.0)];

        let effects = resolve_effects(&presets, &overrides, &[]).unwrap();
        assert_eq!(effects, vec![EffectSpec::new("fx/rain.wav", 0.5)]);
    }

    #[test]
    fn files_follow_presets() {
        let presets = [preset("rain", 0.2)];
        let files = [("my/birds.mp3".to_string(), 0.7), ("my/off.wav".to_string(), 0.0)];

        let effects = resolve_effects(&presets, &[], &files).unwrap();
        assert_eq!(
            effects,
            vec![
                EffectSpec::new("fx/rain.wav", 0.2),
                EffectSpec::new("my/birds.mp3", 0.7),
            ]
        );
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = resolve_effects(&[], &[("thunder".to_string(), 1.0)], &[]).unwrap_err();
        assert!(err.to_string().contains("thunder"));
    }
}
