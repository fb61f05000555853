pub use anyhow::{bail, ensure, format_err, Context as _, Result};
pub use bbox::{prelude::*, Padding, Transform, HW, TLBR};
pub use itertools::{izip, Itertools as _};
pub use log::{debug, info, warn};
pub use ndarray::{
    s, Array, Array1, Array2, Array3, ArrayBase, ArrayD, ArrayView1, Axis, Data, Dimension, Ix3,
    IxDyn, Slice,
};
pub use noisy_float::prelude::*;
pub use num_traits::{One, ToPrimitive, Zero};
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    ops::Neg,
    path::{Path, PathBuf},
};
#[cfg(feature = "profiling")]
pub use std::time::{Duration, Instant};
