pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use approx::{abs_diff_eq, AbsDiffEq};
pub use itertools::{iproduct, izip, Itertools as _};
pub use log::{debug, info, warn};
pub use ndarray::{s, Array, Array2, Array3, Array4, ArrayD, ArrayView3, Axis, Ix3, Zip};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng, seq::SliceRandom};
pub use rand_distr::StandardNormal;
pub use serde::{
    de::Error as DeserializeError, Deserialize, Deserializer, Serialize, Serializer,
};
pub use std::{
    convert::{TryFrom, TryInto},
    fmt::Debug,
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};
