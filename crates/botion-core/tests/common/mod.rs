//! Scripted stand-ins for the hardware ports.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::Ipv4Addr;

use botion_core::domain::entity::{CredentialSlot, CredentialValue, Credentials};
use botion_core::domain::ports::{
    ApiMethod, ApiRequest, CredentialStore, DisplaySurface, HttpTransport, Ink, NetworkLink,
    StorageError, TextSize, TransportError,
};
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_storage::nor_flash::{
    ErrorType as FlashErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};

// -----------------------------------------------------------------------------
// Remote store
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: ApiMethod,
    pub url: String,
    pub api_key: String,
    pub body: String,
}

pub type Answer = Result<(u16, String), TransportError>;

/// Answers queries and updates from separate scripts. The last answer of a
/// script repeats once the script runs out.
#[derive(Default)]
pub struct FakeTransport {
    pub queries: VecDeque<Answer>,
    pub updates: VecDeque<Answer>,
    pub sent: Vec<SentRequest>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_query(mut self, status: u16, body: &str) -> Self {
        self.queries.push_back(Ok((status, body.to_owned())));
        self
    }

    pub fn fail_query(mut self, error: TransportError) -> Self {
        self.queries.push_back(Err(error));
        self
    }

    pub fn answer_update(mut self, status: u16) -> Self {
        self.updates.push_back(Ok((status, "{}".to_owned())));
        self
    }

    pub fn fail_update(mut self, error: TransportError) -> Self {
        self.updates.push_back(Err(error));
        self
    }

    pub fn sent_with(&self, method: ApiMethod) -> Vec<&SentRequest> {
        self.sent.iter().filter(|r| r.method == method).collect()
    }

    fn next_answer(script: &mut VecDeque<Answer>) -> Answer {
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap_or(Err(TransportError::Connect))
        }
    }
}

impl HttpTransport for FakeTransport {
    async fn send<R>(
        &mut self,
        request: &ApiRequest<'_>,
        on_response: impl FnOnce(u16, &[u8]) -> R,
    ) -> Result<R, TransportError> {
        self.sent.push(SentRequest {
            method: request.method,
            url: request.url.to_owned(),
            api_key: request.api_key.to_owned(),
            body: String::from_utf8_lossy(request.body).into_owned(),
        });
        let script = match request.method {
            ApiMethod::Post => &mut self.queries,
            ApiMethod::Patch => &mut self.updates,
        };
        let (status, body) = Self::next_answer(script)?;
        Ok(on_response(status, body.as_bytes()))
    }
}

/// One page object in the shape the store returns.
pub fn page(id: &str, done: bool, name: &str, category: &str, due: Option<&str>) -> String {
    let due = match due {
        Some(start) => format!(r#"{{"date":{{"start":"{start}","end":null}}}}"#),
        None => r#"{"date":null}"#.to_owned(),
    };
    format!(
        r#"{{"object":"page","id":"{id}","properties":{{
            "Done":{{"type":"checkbox","checkbox":{done}}},
            "Name":{{"type":"title","title":[{{"type":"text","plain_text":"{name}"}}]}},
            "Category":{{"type":"multi_select","multi_select":[{{"id":"c1","name":"{category}","color":"red"}}]}},
            "Due":{due}
        }}}}"#
    )
}

pub fn results(pages: &[String]) -> String {
    format!(r#"{{"object":"list","results":[{}],"has_more":false}}"#, pages.join(","))
}

pub fn credentials(list_id: &str) -> Credentials {
    let mut credentials = Credentials::default();
    credentials.set(CredentialSlot::NetworkName, value("home"));
    credentials.set(CredentialSlot::NetworkSecret, value("hunter22"));
    credentials.set(CredentialSlot::ApiKey, value("secret_abc"));
    credentials.set(CredentialSlot::ListId, value(list_id));
    credentials
}

pub fn value(text: &str) -> CredentialValue {
    CredentialValue::try_from(text).unwrap()
}

// -----------------------------------------------------------------------------
// Display
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Clear,
    Cursor(i32, i32),
    Size(TextSize),
    Ink(Ink),
    Text(String),
}

/// Keeps every presented frame as the list of draw calls that built it.
#[derive(Default)]
pub struct RecordingSurface {
    pub pending: Vec<Draw>,
    pub frames: Vec<Vec<Draw>>,
    pub fail_present: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text drawn in a frame, in order.
    pub fn texts(frame: &[Draw]) -> Vec<&str> {
        frame
            .iter()
            .filter_map(|draw| match draw {
                Draw::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_texts(&self) -> Vec<&str> {
        self.frames.last().map(|f| Self::texts(f)).unwrap_or_default()
    }

    pub fn frames_containing(&self, text: &str) -> usize {
        self.frames
            .iter()
            .filter(|frame| Self::texts(frame).contains(&text))
            .count()
    }
}

impl DisplaySurface for RecordingSurface {
    type Error = &'static str;

    fn width(&self) -> i32 {
        128
    }

    fn clear(&mut self) {
        self.pending.push(Draw::Clear);
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.pending.push(Draw::Cursor(x, y));
    }

    fn set_text_size(&mut self, size: TextSize) {
        self.pending.push(Draw::Size(size));
    }

    fn set_ink(&mut self, ink: Ink) {
        self.pending.push(Draw::Ink(ink));
    }

    fn println(&mut self, text: &str) {
        self.pending.push(Draw::Text(text.to_owned()));
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        let frame = std::mem::take(&mut self.pending);
        if self.fail_present {
            return Err("bus error");
        }
        self.frames.push(frame);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Button and time
// -----------------------------------------------------------------------------

/// Replays a script of line levels (`true` = held down), then stays at `rest`.
pub struct ScriptedPin {
    pub script: VecDeque<bool>,
    pub rest: bool,
    pub reads: usize,
}

impl ScriptedPin {
    pub fn new(script: &[bool], rest: bool) -> Self {
        Self {
            script: script.iter().copied().collect(),
            rest,
            reads: 0,
        }
    }

    pub fn released() -> Self {
        Self::new(&[], false)
    }
}

impl PinErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.reads += 1;
        Ok(self.script.pop_front().unwrap_or(self.rest))
    }
}

#[derive(Default)]
pub struct RecordingDelay {
    pub calls_ms: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.calls_ms.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls_ms.push(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls_ms.push(ms);
    }
}

// -----------------------------------------------------------------------------
// Network link
// -----------------------------------------------------------------------------

pub struct FakeLink {
    /// `is_joined` turns true on this poll; `None` never joins.
    pub joins_on_poll: Option<usize>,
    pub refuse_join: bool,
    /// `begin_join` stays pending for this many polls; `None` never returns.
    pub start_polls: Option<usize>,
    pub polls: usize,
    pub joined_with: Option<(String, String)>,
    pub access_point: Option<String>,
}

impl FakeLink {
    pub fn joining_on(poll: usize) -> Self {
        Self {
            joins_on_poll: Some(poll),
            refuse_join: false,
            start_polls: Some(0),
            polls: 0,
            joined_with: None,
            access_point: None,
        }
    }

    pub fn never_joining() -> Self {
        Self {
            joins_on_poll: None,
            ..Self::joining_on(0)
        }
    }
}

impl NetworkLink for FakeLink {
    type Error = &'static str;

    async fn begin_join(&mut self, name: &str, secret: &str) -> Result<(), Self::Error> {
        self.joined_with = Some((name.to_owned(), secret.to_owned()));
        match self.start_polls {
            Some(polls) => {
                for _ in 0..polls {
                    embassy_futures::yield_now().await;
                }
            }
            None => core::future::pending::<()>().await,
        }
        if self.refuse_join {
            return Err("radio off");
        }
        Ok(())
    }

    fn is_joined(&mut self) -> bool {
        self.polls += 1;
        self.joins_on_poll.is_some_and(|poll| self.polls >= poll)
    }

    async fn start_access_point(&mut self, name: &str) -> Result<Ipv4Addr, Self::Error> {
        self.access_point = Some(name.to_owned());
        Ok(Ipv4Addr::new(192, 168, 4, 1))
    }
}

// -----------------------------------------------------------------------------
// Storage
// -----------------------------------------------------------------------------

pub const SECTOR: usize = 4096;

#[derive(Debug)]
pub struct FlashFault;

impl NorFlashError for FlashFault {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

/// NOR flash in memory: erase sets bytes to `0xFF`, writes can only clear bits.
pub struct MemFlash {
    pub data: Vec<u8>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub erases: usize,
}

impl MemFlash {
    pub fn new(sectors: usize) -> Self {
        Self {
            data: vec![0xFF; sectors * SECTOR],
            fail_reads: false,
            fail_writes: false,
            erases: 0,
        }
    }
}

impl FlashErrorType for MemFlash {
    type Error = FlashFault;
}

impl ReadNorFlash for MemFlash {
    const READ_SIZE: usize = 4;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(FlashFault);
        }
        let start = offset as usize;
        bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl NorFlash for MemFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = SECTOR;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(FlashFault);
        }
        self.erases += 1;
        self.data[from as usize..to as usize].fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(FlashFault);
        }
        let start = offset as usize;
        for (cell, byte) in self.data[start..start + bytes.len()].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        Ok(())
    }
}

/// Credential store kept in a plain array, with an optional write failure.
#[derive(Default)]
pub struct MemStore {
    pub slots: [String; 4],
    pub writes: Vec<CredentialSlot>,
    pub fail_writes: bool,
}

impl CredentialStore for MemStore {
    fn read(&mut self, slot: CredentialSlot) -> Result<CredentialValue, StorageError> {
        CredentialValue::try_from(self.slots[slot.index()].as_str()).map_err(|()| StorageError::TooLong)
    }

    fn write(&mut self, slot: CredentialSlot, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        self.slots[slot.index()] = value.to_owned();
        self.writes.push(slot);
        Ok(())
    }
}
