//! Production inputs: the landmark extractor process and the microphone.

use crate::config::{GestureConfig, VoiceConfig};
use crate::gesture::{FrameSource, LandmarkStream};
use crate::stt::ModelPaths;
use crate::voice::{open_speech_source, SpeechSource};

use super::controller::{ControllerError, InputFactory};

pub struct DeviceInputs {
    gesture: GestureConfig,
    voice: VoiceConfig,
    models: ModelPaths,
}

impl DeviceInputs {
    pub fn new(gesture: GestureConfig, voice: VoiceConfig, models: ModelPaths) -> Self {
        Self {
            gesture,
            voice,
            models,
        }
    }
}

impl InputFactory for DeviceInputs {
    fn open_frames(&mut self) -> Result<Box<dyn FrameSource>, ControllerError> {
        let stream = LandmarkStream::spawn(&self.gesture.landmark_command, self.gesture.mirror)
            .map_err(|e| ControllerError::DeviceUnavailable(e.to_string()))?;
        Ok(Box::new(stream))
    }

    fn open_speech(&mut self) -> Result<Box<dyn SpeechSource>, ControllerError> {
        Ok(open_speech_source(&self.voice, &self.models)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(dir: &std::path::Path, landmark_command: Vec<String>) -> DeviceInputs {
        DeviceInputs::new(
            GestureConfig {
                landmark_command,
                ..GestureConfig::default()
            },
            VoiceConfig::default(),
            ModelPaths::new(dir),
        )
    }

    #[test]
    fn missing_extractor_is_device_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut inputs = inputs(dir.path(), vec!["/nonexistent/hand-landmarks".into()]);
        assert!(matches!(
            inputs.open_frames(),
            Err(ControllerError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn missing_model_is_startup_asset_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut inputs = inputs(dir.path(), Vec::new());
        assert!(matches!(
            inputs.open_speech(),
            Err(ControllerError::StartupAssetMissing(_))
        ));
    }
}
