/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “GEOGET” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::fmt::Display;
use std::fmt::Write;

pub fn mk_string<T: Display> (items: &[T], sep: &str) -> String {
    let mut s = String::new();
    for (i,item) in items.iter().enumerate() {
        if i > 0 { s.push_str(sep); }
        write!( s, "{}", item).unwrap(); // writing to a String cannot fail
    }
    s
}

pub fn to_sorted_string_vec (items: &[String]) -> Vec<String> {
    let mut v: Vec<String> = items.to_vec();
    v.sort();
    v
}
