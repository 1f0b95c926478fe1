mod arbiter;
