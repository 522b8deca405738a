//! The claimer's "new claim" form.

use chrono::Utc;

use autoclaim_protocol::{
    Location, MediaCapture, MediaSet, Submission, SubmissionStatus, MAX_DESCRIPTION_CHARS,
};

use crate::StateError;

/// Photo with a caption such as "front bumper".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImage {
    pub label: String,
    pub capture: MediaCapture,
}

#[derive(Debug, Clone, Default)]
pub struct DraftClaim {
    title: String,
    description: String,
    voice: Option<MediaCapture>,
    images: Vec<LabeledImage>,
    video: Option<MediaCapture>,
    location: Option<Location>,
}

fn expect_kind(capture: &MediaCapture, prefix: &'static str) -> Result<(), StateError> {
    if capture.mime_type.starts_with(prefix) {
        Ok(())
    } else {
        Err(StateError::InvalidMedia {
            expected: prefix,
            mime: capture.mime_type.clone(),
        })
    }
}

impl DraftClaim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the description. Longer than the form limit is refused.
    pub fn set_description(&mut self, text: impl Into<String>) -> Result<(), StateError> {
        let text = text.into();
        if text.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(StateError::DescriptionTooLong {
                max: MAX_DESCRIPTION_CHARS,
            });
        }
        self.description = text;
        Ok(())
    }

    pub fn attach_voice(&mut self, capture: MediaCapture) -> Result<(), StateError> {
        expect_kind(&capture, "audio/")?;
        self.voice = Some(capture);
        Ok(())
    }

    pub fn add_image(
        &mut self,
        label: impl Into<String>,
        capture: MediaCapture,
    ) -> Result<(), StateError> {
        expect_kind(&capture, "image/")?;
        self.images.push(LabeledImage {
            label: label.into(),
            capture,
        });
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Option<LabeledImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn attach_video(&mut self, capture: MediaCapture) -> Result<(), StateError> {
        expect_kind(&capture, "video/")?;
        self.video = Some(capture);
        Ok(())
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn images(&self) -> &[LabeledImage] {
        &self.images
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Render the draft as a submission and log it. Nothing is stored.
    pub fn submit(&self, submission_no: u32) -> Submission {
        let location = self.location.clone().unwrap_or(Location {
            lat: autoclaim_protocol::DEFAULT_MAP_LAT,
            lng: autoclaim_protocol::DEFAULT_MAP_LNG,
            address: String::new(),
        });
        let submission = Submission {
            id: format!("draft-{submission_no:03}"),
            submission_no,
            token_id: None,
            title: if self.title.is_empty() {
                "Untitled claim".into()
            } else {
                self.title.clone()
            },
            date: Utc::now().format("%d %b %Y").to_string(),
            status: SubmissionStatus::Submitted,
            description: self.description.clone(),
            location,
            media: MediaSet {
                images: self.images.iter().map(|i| i.capture.file_name.clone()).collect(),
                videos: self.video.iter().map(|v| v.file_name.clone()).collect(),
                voice: self.voice.iter().map(|v| v.file_name.clone()).collect(),
            },
        };
        tracing::info!(
            id = %submission.id,
            media = submission.media.total(),
            has_location = self.location.is_some(),
            "Draft claim submitted"
        );
        submission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_limit_is_enforced() {
        let mut draft = DraftClaim::new();
        assert!(draft.set_description("x".repeat(MAX_DESCRIPTION_CHARS)).is_ok());
        let err = draft
            .set_description("x".repeat(MAX_DESCRIPTION_CHARS + 1))
            .unwrap_err();
        assert!(matches!(err, StateError::DescriptionTooLong { max: 1000 }));
        assert_eq!(draft.description().len(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn media_kinds_are_checked() {
        let mut draft = DraftClaim::new();
        assert!(draft
            .attach_voice(MediaCapture::new("clip.mp4", "video/mp4"))
            .is_err());
        assert!(draft
            .add_image("front", MediaCapture::new("front.jpg", "image/jpeg"))
            .is_ok());
        assert!(draft
            .attach_video(MediaCapture::new("dash.mp4", "video/mp4"))
            .is_ok());
    }

    #[test]
    fn submit_collects_media_names() {
        let mut draft = DraftClaim::new();
        draft.set_title("Car park dent");
        draft
            .add_image("rear", MediaCapture::new("rear.jpg", "image/jpeg"))
            .unwrap();
        draft
            .attach_voice(MediaCapture::new("note.webm", "audio/webm"))
            .unwrap();
        let submission = draft.submit(4);
        assert_eq!(submission.id, "draft-004");
        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.media.images, vec!["rear.jpg".to_string()]);
        assert_eq!(submission.media.voice, vec!["note.webm".to_string()]);
        assert!(submission.media.videos.is_empty());
    }

    #[test]
    fn remove_image_out_of_range() {
        let mut draft = DraftClaim::new();
        assert!(draft.remove_image(0).is_none());
    }
}
