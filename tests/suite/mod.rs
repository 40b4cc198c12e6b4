mod composition;
mod consistency;
mod effects;
mod keyed;
