mod capture;
mod gesture;
mod presentation;
mod session;
