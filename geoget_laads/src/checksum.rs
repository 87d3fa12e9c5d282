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

use std::{fs::File, io::Read, path::Path};
use crate::errors::Result;

const BUF_SIZE: usize = 65536;

/// the CRC32C checksum of the file at `path`, computed by streaming its contents.
/// Only depends on the file contents, i.e. two files with the same bytes always
/// produce the same value
pub fn compute (path: impl AsRef<Path>) -> Result<u32> {
    let mut file = File::open( path.as_ref())?;
    let mut buf = vec![0u8; BUF_SIZE];
    let mut crc: u32 = 0;

    loop {
        let n = file.read( &mut buf)?;
        if n == 0 { break }
        crc = crc32c::crc32c_append( crc, &buf[..n]);
    }
    Ok(crc)
}

/// does the file at `path` have the expected checksum
pub fn verify (path: impl AsRef<Path>, expected: u32) -> Result<bool> {
    Ok( compute(path)? == expected )
}
