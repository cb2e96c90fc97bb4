mod output;
mod result;
mod terminate;
mod timeout;
mod wait;
