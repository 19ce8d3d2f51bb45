// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_ellipsis;
mod test_layout;
mod test_paint;
pub(crate) mod utils;
