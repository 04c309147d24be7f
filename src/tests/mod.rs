
mod aromatic;
mod kekule;
mod perceive;
mod relax;
mod rings;
mod utils;
mod walk;
