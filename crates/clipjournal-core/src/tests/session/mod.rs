mod operation;
mod state;
