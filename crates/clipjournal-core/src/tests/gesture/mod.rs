mod classifier;
mod zone;
