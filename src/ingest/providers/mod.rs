pub mod pushshift;
