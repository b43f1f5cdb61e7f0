//! Notion database wire format.
//!
//! Only the fields the device shows are decoded; everything else in a page
//! object is skipped. Text is clipped to the capacity of the [`Task`] fields
//! rather than rejected.

mod date;

use core::fmt;
use core::marker::PhantomData;

use heapless::String;
use serde::de::{self, Deserializer, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    INVALID_DUE_DATE, NO_DUE_DATE, TASK_CATEGORY_LEN, TASK_ID_LEN, TASK_NAME_LEN, Task,
};

pub use date::{MalformedDueDate, ShortDate, format_due_date};

/// Base of every API URL, with trailing slash.
pub const API_BASE_URL: &str = "https://api.notion.com/v1/";

/// Records requested per query. The first pending record wins, so a small
/// page keeps the response inside the receive buffer.
pub const QUERY_PAGE_SIZE: u8 = 10;

/// `Done` checkbox set, nothing else touched.
pub const MARK_DONE_BODY: &[u8] = br#"{"properties":{"Done":{"checkbox":true}}}"#;

const RAW_DATE_LEN: usize = 32;
/// Scratch space for unescaping one string value of the response.
const UNESCAPE_BUFFER_LEN: usize = 1024;

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    filter: QueryFilter<'a>,
    page_size: u8,
}

#[derive(Debug, Serialize)]
struct QueryFilter<'a> {
    and: &'a [PropertyFilter<'a>],
}

#[derive(Debug, Serialize)]
struct PropertyFilter<'a> {
    property: &'a str,
    multi_select: Contains<'a>,
}

#[derive(Debug, Serialize)]
struct Contains<'a> {
    contains: &'a str,
}

/// Write the query body selecting records tagged with `category` into `buf`.
pub fn encode_query(category: &str, buf: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
    let filters = [PropertyFilter {
        property: "Category",
        multi_select: Contains { contains: category },
    }];
    let request = QueryRequest {
        filter: QueryFilter { and: &filters },
        page_size: QUERY_PAGE_SIZE,
    };
    serde_json_core::to_slice(&request, buf)
}

/// Outcome of scanning a query response.
#[derive(Debug, Default)]
pub struct QueryScan {
    /// Records inspected before the scan stopped.
    pub inspected: usize,
    pub first_pending: Option<Task>,
}

/// Scan a query response for the first record whose `Done` box is unchecked.
pub fn decode_query(body: &[u8]) -> Result<QueryScan, serde_json_core::de::Error> {
    let mut unescaped = [0u8; UNESCAPE_BUFFER_LEN];
    let (response, _) =
        serde_json_core::from_slice_escaped::<QueryResponse>(body, &mut unescaped)?;
    Ok(response.results)
}

#[derive(Deserialize)]
struct QueryResponse {
    results: QueryScan,
}

impl<'de> Deserialize<'de> for QueryScan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScanVisitor;

        impl<'de> Visitor<'de> for ScanVisitor {
            type Value = QueryScan;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of page objects")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<QueryScan, A::Error> {
                let mut scan = QueryScan::default();
                while let Some(page) = seq.next_element::<PageRecord>()? {
                    scan.inspected += 1;
                    if !page.properties.done.checkbox {
                        scan.first_pending = Some(page.into_task());
                        break;
                    }
                }
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(scan)
            }
        }

        deserializer.deserialize_seq(ScanVisitor)
    }
}

#[derive(Deserialize)]
struct PageRecord {
    id: Clipped<TASK_ID_LEN>,
    #[serde(default)]
    properties: PageProperties,
}

impl PageRecord {
    fn into_task(self) -> Task {
        let properties = self.properties;
        let due_date = match properties.due.date.and_then(|range| range.start) {
            Some(start) => match format_due_date(&start.0) {
                Ok(short) => clip(&short),
                Err(MalformedDueDate) => {
                    log::warn!("notion: unreadable due date on {}", self.id.0);
                    clip(INVALID_DUE_DATE)
                }
            },
            None => clip(NO_DUE_DATE),
        };
        Task {
            id: self.id.0,
            name: properties.name.title.0,
            category: properties
                .category
                .multi_select
                .0
                .map(|option| option.name.0)
                .unwrap_or_default(),
            due_date,
            done: properties.done.checkbox,
        }
    }
}

#[derive(Default, Deserialize)]
struct PageProperties {
    #[serde(rename = "Done", default)]
    done: Checkbox,
    #[serde(rename = "Name", default)]
    name: TitleProperty,
    #[serde(rename = "Category", default)]
    category: MultiSelectProperty,
    #[serde(rename = "Due", default)]
    due: DateProperty,
}

#[derive(Default, Deserialize)]
struct Checkbox {
    #[serde(default)]
    checkbox: bool,
}

#[derive(Default, Deserialize)]
struct TitleProperty {
    #[serde(default)]
    title: Joined<TASK_NAME_LEN>,
}

#[derive(Default, Deserialize)]
struct MultiSelectProperty {
    #[serde(default)]
    multi_select: First<SelectOption>,
}

#[derive(Deserialize)]
struct SelectOption {
    name: Clipped<TASK_CATEGORY_LEN>,
}

#[derive(Default, Deserialize)]
struct DateProperty {
    #[serde(default)]
    date: Option<DateRange>,
}

#[derive(Deserialize)]
struct DateRange {
    #[serde(default)]
    start: Option<Clipped<RAW_DATE_LEN>>,
}

#[derive(Deserialize)]
struct RichText {
    #[serde(default)]
    plain_text: Clipped<TASK_NAME_LEN>,
}

fn clip<const N: usize>(text: &str) -> String<N> {
    let mut clipped = String::new();
    push_clipped(&mut clipped, text);
    clipped
}

fn push_clipped<const N: usize>(target: &mut String<N>, text: &str) {
    for ch in text.chars() {
        if target.push(ch).is_err() {
            break;
        }
    }
}

/// A string keeping as many leading characters as fit.
#[derive(Debug, Default)]
struct Clipped<const N: usize>(String<N>);

impl<'de, const N: usize> Deserialize<'de> for Clipped<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClipVisitor<const N: usize>;

        impl<const N: usize> Visitor<'_> for ClipVisitor<N> {
            type Value = Clipped<N>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Clipped<N>, E> {
                Ok(Clipped(clip(value)))
            }
        }

        deserializer.deserialize_str(ClipVisitor::<N>)
    }
}

/// The concatenated `plain_text` of a rich text array.
#[derive(Debug, Default)]
struct Joined<const N: usize>(String<N>);

impl<'de, const N: usize> Deserialize<'de> for Joined<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct JoinVisitor<const N: usize>;

        impl<'de, const N: usize> Visitor<'de> for JoinVisitor<N> {
            type Value = Joined<N>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of rich text objects")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Joined<N>, A::Error> {
                let mut joined = String::new();
                while let Some(segment) = seq.next_element::<RichText>()? {
                    push_clipped(&mut joined, &segment.plain_text.0);
                }
                Ok(Joined(joined))
            }
        }

        deserializer.deserialize_seq(JoinVisitor::<N>)
    }
}

/// The first element of an array; the rest is skipped.
struct First<T>(Option<T>);

impl<T> Default for First<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for First<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FirstVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for FirstVisitor<T> {
            type Value = First<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<First<T>, A::Error> {
                let first = seq.next_element::<T>()?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(First(first))
            }
        }

        deserializer.deserialize_seq(FirstVisitor(PhantomData))
    }
}
