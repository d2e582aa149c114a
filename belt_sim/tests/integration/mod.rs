mod compensation;
mod config_loading;
mod trimming;
