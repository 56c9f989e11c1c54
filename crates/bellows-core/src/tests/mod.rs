mod state;
mod topology;
