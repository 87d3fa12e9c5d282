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

use num::{Num,ToPrimitive};
use serde::{Serialize,Deserialize};

/// rectangular lat/lon region given in degrees. Note the axis order follows the
/// common `(west,south,east,north)` convention of geospatial web services
#[repr(C)]
#[derive(Debug,Copy,Clone,Serialize,Deserialize,PartialEq)]
pub struct BoundingBox <T: Num> {
    pub west: T,
    pub south: T,
    pub east: T,
    pub north: T
}

impl <T: Num + Copy + ToPrimitive> BoundingBox<T> {
    pub fn new (west: T, south: T, east: T, north: T)->Self {
        BoundingBox { west, south, east, north }
    }

    pub fn from_wsen<N> (wsen: &[N;4]) -> BoundingBox<T> where N: Num + Copy + Into<T> {
        BoundingBox::new( wsen[0].into(), wsen[1].into(), wsen[2].into(), wsen[3].into())
    }

    pub fn to_minmax_array (&self) -> [T;4] {
        [self.west, self.south, self.east, self.north]
    }
}
