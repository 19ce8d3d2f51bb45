// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
mod mock;

pub(crate) use env::TestEnv;
pub(crate) use mock::{Command, CountingShaper, MockObject, MockTypeface, RecordingSink};
