//! The in-memory session and its transition rules.
//!
//! Every asynchronous completion carries a ticket taken when the work was
//! started. The session only accepts a completion whose ticket still matches
//! its current epoch (and, for uploads, the latest upload sequence), so a
//! reset or a newer upload silently orphans older work.

use crate::{
    error::{AvatarError, Result},
    models::{EncodedImage, WorkflowState},
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    pub epoch: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub epoch: u64,
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub original_image: Option<EncodedImage>,
    pub generated_image: Option<EncodedImage>,
    pub state: WorkflowState,
}

#[derive(Debug, Default)]
pub struct Session {
    original_image: Option<EncodedImage>,
    generated_image: Option<EncodedImage>,
    state: WorkflowState,
    epoch: u64,
    upload_seq: u64,
    active_request: Option<RequestTicket>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn original_image(&self) -> Option<&EncodedImage> {
        self.original_image.as_ref()
    }

    pub fn generated_image(&self) -> Option<&EncodedImage> {
        self.generated_image.as_ref()
    }

    pub fn active_request(&self) -> Option<RequestTicket> {
        self.active_request
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            original_image: self.original_image.clone(),
            generated_image: self.generated_image.clone(),
            state: self.state,
        }
    }

    /// Uploads are refused while a generation is running.
    pub fn begin_upload(&mut self) -> Result<UploadTicket> {
        if self.state == WorkflowState::Processing {
            return Err(AvatarError::Busy(
                "cannot replace the image while a generation is running".into(),
            ));
        }
        self.upload_seq += 1;
        Ok(UploadTicket {
            epoch: self.epoch,
            seq: self.upload_seq,
        })
    }

    fn upload_is_current(&self, ticket: UploadTicket) -> bool {
        ticket.epoch == self.epoch && ticket.seq == self.upload_seq
    }

    /// Replaces the original image. Returns false for a superseded upload.
    pub fn complete_upload(&mut self, ticket: UploadTicket, image: EncodedImage) -> bool {
        if !self.upload_is_current(ticket) {
            return false;
        }
        self.epoch += 1;
        self.original_image = Some(image);
        self.generated_image = None;
        self.state = WorkflowState::Idle;
        self.active_request = None;
        true
    }

    pub fn fail_upload(&mut self, ticket: UploadTicket) -> bool {
        if !self.upload_is_current(ticket) {
            return false;
        }
        self.epoch += 1;
        self.state = WorkflowState::Error;
        self.active_request = None;
        true
    }

    /// Moves to `Processing` and hands back the image to send.
    ///
    /// `Ok(None)` when there is nothing to generate from.
    pub fn begin_generation(&mut self) -> Result<Option<(RequestTicket, EncodedImage)>> {
        if self.state == WorkflowState::Processing {
            return Err(AvatarError::GenerationInFlight);
        }
        let image = match &self.original_image {
            Some(image) => image.clone(),
            None => return Ok(None),
        };

        let ticket = RequestTicket {
            epoch: self.epoch,
            id: Uuid::new_v4(),
        };
        // A decode still in flight would replace the image being generated from.
        self.upload_seq += 1;
        self.state = WorkflowState::Processing;
        self.active_request = Some(ticket);
        Ok(Some((ticket, image)))
    }

    /// Applies a generation outcome. Returns the new state, or `None` when the
    /// request was abandoned and the outcome was dropped.
    pub fn complete_generation(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<EncodedImage>,
    ) -> Option<WorkflowState> {
        if self.active_request != Some(ticket)
            || self.epoch != ticket.epoch
            || self.state != WorkflowState::Processing
        {
            return None;
        }

        self.active_request = None;
        match outcome {
            Ok(image) => {
                self.generated_image = Some(image);
                self.state = WorkflowState::Success;
            }
            Err(_) => {
                self.state = WorkflowState::Error;
            }
        }
        Some(self.state)
    }

    pub fn retry(&mut self) -> bool {
        if self.state != WorkflowState::Error {
            return false;
        }
        self.state = WorkflowState::Idle;
        true
    }

    pub fn reset(&mut self) {
        self.epoch += 1;
        self.original_image = None;
        self.generated_image = None;
        self.state = WorkflowState::Idle;
        self.active_request = None;
    }
}
