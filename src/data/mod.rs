pub mod ctf;

pub use ctf::{read_ctf, CtfSchema, Minibatch, MinibatchSource, Randomize, Record, StreamDef, Sweeps};
