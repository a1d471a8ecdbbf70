// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Time related utils.

use chrono::Utc;

/// The datetime used by sitestack, always in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Get the current UTC time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime into an HTTP date as required by the storage service,
/// e.g. `Mon, 27 Jul 2009 12:28:53 GMT`.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_http_date() {
        let t = Utc.with_ymd_and_hms(2009, 7, 27, 12, 28, 53).unwrap();
        assert_eq!(format_http_date(t), "Mon, 27 Jul 2009 12:28:53 GMT");
    }
}
