// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! # Configuration value parsers
use chrono::TimeDelta;
use serde::{Deserialize, Deserializer};

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(Into::into)
        .collect()
}

/// Comma separated list.
pub fn csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(split_csv(&String::deserialize(deserializer)?))
}

/// Optional comma separated list.
pub fn optional_csv<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|x| split_csv(&x)))
}

/// Deserializes an i64 and interprets it as total SECONDS for TimeDelta.
pub fn timedelta_from_seconds<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = i64::deserialize(deserializer)?;
    TimeDelta::try_seconds(seconds)
        .ok_or_else(|| serde::de::Error::custom("TimeDelta overflow for seconds"))
}

/// Deserializes an `Option<i64>` and interprets `Some(i64)` as total SECONDS
/// for TimeDelta.
pub fn optional_timedelta_from_seconds<'de, D>(
    deserializer: D,
) -> Result<Option<TimeDelta>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        Some(seconds) => TimeDelta::try_seconds(seconds)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("TimeDelta overflow for optional seconds")),
        None => Ok(None),
    }
}

/// Deserializes an i64 and interprets it as total MILLISECONDS for TimeDelta.
pub fn timedelta_from_millis<'de, D>(deserializer: D) -> Result<TimeDelta, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = i64::deserialize(deserializer)?;
    TimeDelta::try_milliseconds(millis)
        .ok_or_else(|| serde::de::Error::custom("TimeDelta overflow for milliseconds"))
}

/// Deserializes an `Option<i64>` and interprets `Some(i64)` as total
/// MILLISECONDS for TimeDelta.
pub fn optional_timedelta_from_millis<'de, D>(
    deserializer: D,
) -> Result<Option<TimeDelta>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<i64>::deserialize(deserializer)? {
        Some(millis) => TimeDelta::try_milliseconds(millis)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("TimeDelta overflow for optional milliseconds")),
        None => Ok(None),
    }
}
