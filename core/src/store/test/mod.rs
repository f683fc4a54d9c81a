mod grouping;
mod util;
