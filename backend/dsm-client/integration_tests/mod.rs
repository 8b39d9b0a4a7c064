mod dispatch;
mod helpers;
mod products;
mod session;
mod users;
